//! Bare URL detection in text runs.

use crate::url::starts_with_ignore_case;

/// A slice of a text run after URL detection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Url {
        /// Completed URL (`http://` prepended for `www.` hosts).
        url: String,
        label: &'a str,
        /// Protocol the parser filled in; `None` when the text spelled it out.
        protocol: Option<&'static str>,
    },
}

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Split a text run into plain text and bare URLs.
///
/// Recognizes `www.` hosts and explicit `http://`/`https://` URLs that start
/// at a word boundary. Trailing punctuation and unbalanced closing
/// parentheses are left out of the URL.
pub(crate) fn split(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let at_boundary = text[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '*' | '_' | '~'));

        if at_boundary {
            if let Some((len, protocol)) = match_url(rest) {
                if plain_start < pos {
                    segments.push(Segment::Text(&text[plain_start..pos]));
                }
                let label = &rest[..len];
                let url = match protocol {
                    Some(scheme) => format!("{scheme}://{label}"),
                    None => label.to_owned(),
                };
                segments.push(Segment::Url {
                    url,
                    label,
                    protocol,
                });
                pos += len;
                plain_start = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if plain_start < text.len() {
        segments.push(Segment::Text(&text[plain_start..]));
    }
    segments
}

fn match_url(rest: &str) -> Option<(usize, Option<&'static str>)> {
    let (host_start, protocol) = if starts_with_ignore_case(rest, "www.") {
        (0, Some("http"))
    } else {
        let scheme = SCHEMES
            .iter()
            .find(|s| starts_with_ignore_case(rest, s))?;
        (scheme.len(), None)
    };

    let end = rest.find(|c: char| c.is_whitespace() || c == '<').unwrap_or(rest.len());
    let len = trim_trailing(&rest[..end]);

    let host = &rest[host_start..len];
    let domain = host.split(['/', '?', '#']).next().unwrap_or_default();
    let valid_domain = domain.contains('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ':'));
    let has_host = if protocol.is_some() {
        domain.len() > 4
    } else {
        !domain.is_empty()
    };

    (valid_domain && has_host).then_some((len, protocol))
}

fn trim_trailing(candidate: &str) -> usize {
    let mut end = candidate.len();
    loop {
        let s = &candidate[..end];
        match s.chars().next_back() {
            Some('?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"') => end -= 1,
            Some(')') if s.matches(')').count() > s.matches('(').count() => end -= 1,
            _ => return end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_www_gets_http_protocol() {
        let segments = split("see www.example.com now");
        assert_eq!(
            segments,
            vec![
                Segment::Text("see "),
                Segment::Url {
                    url: "http://www.example.com".to_owned(),
                    label: "www.example.com",
                    protocol: Some("http"),
                },
                Segment::Text(" now"),
            ]
        );
    }

    #[test]
    fn test_explicit_scheme_keeps_url() {
        let segments = split("https://example.com/a?b=1.");
        assert_eq!(
            segments,
            vec![
                Segment::Url {
                    url: "https://example.com/a?b=1".to_owned(),
                    label: "https://example.com/a?b=1",
                    protocol: None,
                },
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn test_unbalanced_paren_trimmed() {
        let segments = split("(www.example.com/wiki/Foo_(bar))");
        assert_eq!(segments[0], Segment::Text("("));
        assert_eq!(
            segments[1],
            Segment::Url {
                url: "http://www.example.com/wiki/Foo_(bar)".to_owned(),
                label: "www.example.com/wiki/Foo_(bar)",
                protocol: Some("http"),
            }
        );
        assert_eq!(segments[2], Segment::Text(")"));
    }

    #[test]
    fn test_requires_word_boundary_and_domain() {
        assert_eq!(split("awww.example.com"), vec![Segment::Text("awww.example.com")]);
        assert_eq!(split("www. nothing"), vec![Segment::Text("www. nothing")]);
        assert_eq!(split("http://localhost"), vec![Segment::Text("http://localhost")]);
    }
}
