//! Title cleanup.
//!
//! WordPress titles arrive HTML-escaped and padded with marketing words.
//! Everything shown to clients goes through [`display_title`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Title used when the source has none.
pub const UNTITLED: &str = "Untitled Asset";

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]+)|#[xX]([0-9a-fA-F]+)|(amp|lt|gt|quot|apos|nbsp));")
        .expect("entity regex is valid") // Static pattern, safe to panic
});

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Download\s+|\s+Download|Full Movie").expect("noise regex is valid") // Static pattern, safe to panic
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid")); // Static pattern, safe to panic

/// Decodes the named entities WordPress emits (`&amp; &lt; &gt; &quot;
/// &apos; &nbsp;`) and numeric references (`&#39;`, `&#x27;`).
///
/// References that do not name a valid character are left as written.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    ENTITY.replace_all(text, |caps: &Captures<'_>| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else {
            match caps.get(3).map(|m| m.as_str()) {
                Some("amp") => Some('&'),
                Some("lt") => Some('<'),
                Some("gt") => Some('>'),
                Some("quot") => Some('"'),
                Some("apos") => Some('\''),
                Some("nbsp") => Some(' '),
                _ => None,
            }
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Strips "Download" and "Full Movie" noise, collapses whitespace runs to
/// a single space, and trims.
pub fn clean_title(title: &str) -> String {
    let stripped = NOISE.replace_all(title, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// The title a client sees: decoded, cleaned, and never empty-handed when
/// the source had no title at all.
pub fn display_title(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => clean_title(&decode_html_entities(raw)),
        _ => UNTITLED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            decode_html_entities("Tom &amp; Jerry &lt;3 &quot;hi&quot; it&apos;s"),
            "Tom & Jerry <3 \"hi\" it's"
        );
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_html_entities("It&#039;s &#8211; &#x2019;"), "It's – ’");
    }

    #[test]
    fn test_decode_nbsp_becomes_space() {
        assert_eq!(decode_html_entities("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_decode_invalid_code_point_left_alone() {
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn test_decode_decodes_only_once() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_plain_text_is_borrowed() {
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_clean_title_strips_noise() {
        assert_eq!(
            clean_title("Download Inception (2010) Full Movie 1080p"),
            "Inception (2010) 1080p"
        );
    }

    #[test]
    fn test_clean_title_is_case_insensitive() {
        assert_eq!(clean_title("DOWNLOAD  Heat full movie"), "Heat");
    }

    #[test]
    fn test_clean_title_trailing_download_removed() {
        assert_eq!(clean_title("Heat (1995) Download"), "Heat (1995)");
    }

    #[test]
    fn test_clean_title_collapses_whitespace() {
        assert_eq!(clean_title("  a \t\n b   c "), "a b c");
    }

    #[test]
    fn test_display_title_missing_is_untitled() {
        assert_eq!(display_title(None), UNTITLED);
        assert_eq!(display_title(Some("")), UNTITLED);
    }

    #[test]
    fn test_display_title_decodes_then_cleans() {
        assert_eq!(
            display_title(Some("Download Fast &amp; Furious&nbsp;Full Movie")),
            "Fast & Furious"
        );
    }
}
