//! Wikipedia country outlines rendered as Markdown.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
