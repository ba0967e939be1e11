//! URL classification.

const DANGEROUS_PREFIXES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];

const SAFE_DATA_IMAGES: [&str; 5] = ["png;", "gif;", "jpeg;", "webp;", "svg+xml;"];

/// Whether a link destination could execute script when followed.
///
/// `javascript:`, `vbscript:`, `file:` and `data:` URLs are dangerous,
/// except `data:image/` URLs with a PNG, GIF, JPEG, WebP or SVG payload.
/// Matching is ASCII case-insensitive.
#[must_use]
pub fn is_dangerous_url(url: &str) -> bool {
    let Some(scheme) = DANGEROUS_PREFIXES
        .iter()
        .find(|prefix| starts_with_ignore_case(url, prefix))
    else {
        return false;
    };

    if *scheme == "data:" {
        if let Some(rest) = strip_prefix_ignore_case(url, "data:image/") {
            return !SAFE_DATA_IMAGES
                .iter()
                .any(|image| starts_with_ignore_case(rest, image));
        }
    }
    true
}

/// ASCII case-insensitive prefix test.
#[must_use]
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if starts_with_ignore_case(s, prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_schemes_are_dangerous() {
        assert!(is_dangerous_url("javascript:alert(1)"));
        assert!(is_dangerous_url("JavaScript:alert(1)"));
        assert!(is_dangerous_url("vbscript:msgbox"));
        assert!(is_dangerous_url("file:///etc/passwd"));
        assert!(is_dangerous_url("data:text/html;base64,AAAA"));
    }

    #[test]
    fn test_safe_data_images() {
        assert!(!is_dangerous_url("data:image/png;base64,AAAA"));
        assert!(!is_dangerous_url("DATA:IMAGE/SVG+XML;base64,AAAA"));
        assert!(is_dangerous_url("data:image/bmp;base64,AAAA"));
    }

    #[test]
    fn test_ordinary_urls() {
        assert!(!is_dangerous_url("https://example.com"));
        assert!(!is_dangerous_url("/docs/page"));
        assert!(!is_dangerous_url("mailto:a@b.c"));
        assert!(!is_dangerous_url(""));
    }

    #[test]
    fn test_starts_with_ignore_case_non_ascii() {
        assert!(!starts_with_ignore_case("é", "javascript:"));
        assert!(starts_with_ignore_case("MAILTO:x", "mailto:"));
    }
}
