//! HTML escaping and block identifier slugs.
//!
//! Every string interpolated into rendered markup goes through
//! [`escape_html`]. Content text is data, never markup.

/// Escape the five HTML-significant characters.
///
/// `&` is replaced first so entities produced by the later substitutions are
/// not escaped a second time.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Slugify free-form text into a URL-fragment-safe identifier.
///
/// # Rules
/// 1. Lowercase the entire string
/// 2. Replace every run of characters outside `[a-z0-9]` with one `-`
/// 3. Trim leading/trailing dashes
/// 4. If the result is empty, use `phase-{index}`
#[must_use]
pub fn slugify(text: &str, index: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("phase-{index}")
    } else {
        slug.to_string()
    }
}
