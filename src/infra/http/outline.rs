use axum::{
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use url::form_urlencoded;

use super::HttpState;

pub const OUTLINE_PATH: &str = "/api/outline";
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

const COUNTRY_PARAM: &str = "country";

pub(super) async fn outline(
    State(state): State<HttpState>,
    RawQuery(query): RawQuery,
) -> Response {
    let country = country_param(query.as_deref());

    match state.outlines.outline(country.as_deref()).await {
        Ok(outline) => (
            StatusCode::OK,
            [(CONTENT_TYPE, HeaderValue::from_static(MARKDOWN_CONTENT_TYPE))],
            outline.to_markdown(),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Repeated `country` values are comma-joined so they fail the allow-list
/// instead of one of them being picked silently.
fn country_param(query: Option<&str>) -> Option<String> {
    let values: Vec<String> = form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == COUNTRY_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect();

    (!values.is_empty()).then(|| values.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_decodes_country() {
        assert_eq!(
            country_param(Some("country=New+Zealand")).as_deref(),
            Some("New Zealand")
        );
        assert_eq!(
            country_param(Some("lang=en&country=Costa%20Rica")).as_deref(),
            Some("Costa Rica")
        );
    }

    #[test]
    fn absent_parameter_is_none() {
        assert_eq!(country_param(None), None);
        assert_eq!(country_param(Some("")), None);
        assert_eq!(country_param(Some("name=Germany")), None);
    }

    #[test]
    fn empty_value_is_kept_for_the_service_to_reject() {
        assert_eq!(country_param(Some("country=")).as_deref(), Some(""));
    }

    #[test]
    fn repeated_values_are_joined() {
        assert_eq!(
            country_param(Some("country=Chad&country=Niger")).as_deref(),
            Some("Chad,Niger")
        );
    }
}
