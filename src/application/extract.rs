use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::domain::outline::{Heading, HeadingLevel};

/// Headings inside the article body; navigation and sidebars live outside `#content`.
const CONTENT_HEADINGS: &str =
    "#content h1, #content h2, #content h3, #content h4, #content h5, #content h6";

static CONTENT_HEADINGS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(CONTENT_HEADINGS).expect("content heading selector is a valid CSS selector")
});

/// Collect the non-blank headings under `#content` in document order.
pub fn extract_headings(html: &str) -> Vec<Heading> {
    let document = Html::parse_document(html);

    document
        .select(&CONTENT_HEADINGS_SELECTOR)
        .filter_map(|element| {
            let level = HeadingLevel::from_tag_name(element.value().name())?;
            let text: String = element.text().collect();
            Heading::new(level, &text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(headings: &[Heading]) -> Vec<(u8, &str)> {
        headings
            .iter()
            .map(|heading| (heading.level().get(), heading.text()))
            .collect()
    }

    #[test]
    fn keeps_document_order_across_levels() {
        let html = r#"
            <html><body>
              <div id="content">
                <h1>A</h1>
                <h2>B</h2>
                <h3>   </h3>
                <h2>C</h2>
              </div>
            </body></html>
        "#;

        assert_eq!(pairs(&extract_headings(html)), vec![(1, "A"), (2, "B"), (2, "C")]);
    }

    #[test]
    fn ignores_headings_outside_content() {
        let html = r#"
            <html><body>
              <nav><h2>Navigation menu</h2></nav>
              <div id="content"><h1 id="firstHeading">Germany</h1></div>
              <div id="footer"><h2>Footer</h2></div>
            </body></html>
        "#;

        assert_eq!(pairs(&extract_headings(html)), vec![(1, "Germany")]);
    }

    #[test]
    fn collects_nested_text_and_decodes_entities() {
        let html = r#"
            <div id="content">
              <div class="mw-body-content">
                <div class="mw-heading mw-heading2">
                  <h2 id="History"><span>Politics</span> &amp; <i>government</i></h2>
                </div>
              </div>
            </div>
        "#;

        assert_eq!(
            pairs(&extract_headings(html)),
            vec![(2, "Politics & government")]
        );
    }

    #[test]
    fn page_without_content_container_yields_nothing() {
        let html = "<html><body><h1>Orphan</h1><h2>Section</h2></body></html>";
        assert!(extract_headings(html).is_empty());
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = "<div id=content><h2>Economy<h3>Trade</div>";
        assert_eq!(
            pairs(&extract_headings(html)),
            vec![(2, "Economy"), (3, "Trade")]
        );
    }
}
