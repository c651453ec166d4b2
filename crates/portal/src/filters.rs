//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Maximum characters kept by [`excerpt`].
const EXCERPT_CHARS: usize = 160;

/// Returns the current year, for the footer copyright line.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Shortens a description for catalog cards.
///
/// Usage in templates: `{{ course.description|excerpt }}`
#[askama::filter_fn]
pub fn excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(shorten(&value.to_string(), EXCERPT_CHARS))
}

/// Cut `text` to at most `max` characters at a word boundary, adding an ellipsis.
fn shorten(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut: String = text.chars().take(max).collect();
    let cut = cut
        .rsplit_once(char::is_whitespace)
        .map_or(cut.as_str(), |(head, _)| head)
        .trim_end();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("  Know the risks.  ", 40), "Know the risks.");
    }

    #[test]
    fn test_shorten_cuts_at_word_boundary() {
        assert_eq!(
            shorten("Peer pressure and how to respond to it", 20),
            "Peer pressure and…"
        );
    }

    #[test]
    fn test_shorten_single_long_word() {
        assert_eq!(shorten("abcdefghij", 4), "abcd…");
    }
}
