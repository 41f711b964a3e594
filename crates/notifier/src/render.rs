//! Webhook URL rendering.
//!
//! The configured URL is a plain template: every literal `{title}` and
//! `{text}` is replaced with the form-encoded message field. Nothing else in
//! the template is touched, and the result is not validated; a malformed URL
//! only shows up later as a delivery failure.

const TITLE_PLACEHOLDER: &str = "{title}";
const TEXT_PLACEHOLDER: &str = "{text}";

/// Form-encode a single value: unreserved characters (`A-Z a-z 0-9 - _ . ~`)
/// pass through, spaces become `+`, everything else is percent-escaped as UTF-8.
pub fn encode_component(value: &str) -> String {
    // `%` itself is escaped to `%25`, so `%20` can only come from a space.
    urlencoding::encode(value).replace("%20", "+")
}

/// Substitute the encoded title and text into the URL template.
pub fn render_url(template: &str, title: &str, text: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, &encode_component(title))
        .replace(TEXT_PLACEHOLDER, &encode_component(text))
}
