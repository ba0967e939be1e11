//! HTML and URL escaping.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Escape `&`, `<`, `>` and `"` for use in text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    push_escaped(&mut out, s);
    Cow::Owned(out)
}

/// Append `s` to `out` with HTML special characters escaped.
pub fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Bytes left as-is in URLs: ASCII alphanumerics and `-_.!~*'();/?:@&=+$,#`.
const URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'#');

/// Percent-encode a URL for an `href` or `src` attribute.
///
/// Bytes outside the URL-safe set are encoded, except a `%` that already starts
/// a valid escape. The result is not HTML-escaped; see [`escape_url`].
#[must_use]
pub fn percent_encode_url(url: &str) -> Cow<'_, str> {
    let mut encoded = String::with_capacity(url.len());
    let mut last = 0;
    for (i, _) in url.match_indices('%') {
        if is_percent_escape(url, i) {
            encoded.extend(utf8_percent_encode(&url[last..i], URL_SAFE));
            encoded.push('%');
            last = i + 1;
        }
    }
    encoded.extend(utf8_percent_encode(&url[last..], URL_SAFE));

    if encoded == url {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(encoded)
    }
}

fn is_percent_escape(url: &str, at: usize) -> bool {
    url.as_bytes()
        .get(at + 1..at + 3)
        .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
}

/// Percent-encode and HTML-escape a URL for use inside a quoted attribute.
#[must_use]
pub fn escape_url(url: &str) -> String {
    escape_html(&percent_encode_url(url)).into_owned()
}
