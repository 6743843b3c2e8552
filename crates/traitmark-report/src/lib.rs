//! traitmark-report: printable result pages.

pub mod html;

pub use html::{generate_html, write_html_report};
