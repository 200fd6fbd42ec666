//! Deterministic placeholder artwork for products without an image.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Label used when the product has no name either.
pub const FALLBACK_LABEL: &str = "상품";

/// Builds an SVG label card for `label` and returns it as a `data:` URI.
///
/// The same label always yields the same URI.
#[must_use]
pub fn placeholder_data_uri(label: &str) -> String {
    let label = if label.trim().is_empty() {
        FALLBACK_LABEL
    } else {
        label
    };
    let safe: String = label
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '&' | '"'))
        .collect();

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="360">"#,
            r##"<rect width="100%" height="100%" rx="24" ry="24" fill="#f3f4f6"/>"##,
            r#"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" "#,
            r#"font-family="system-ui,-apple-system,Segoe UI,sans-serif" font-size="34" "#,
            r##"fill="#111827">{}</text></svg>"##,
        ),
        safe
    );

    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        utf8_percent_encode(&svg, NON_ALPHANUMERIC)
    )
}
