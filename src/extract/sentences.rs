//! Pure text heuristics used by the extractor

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme URLs, `www.` hosts, and bare `host.tld/path` forms
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[a-z][a-z0-9+.\-]*://\S+|www\.\S+|[a-z0-9\-]+(?:\.[a-z0-9\-]+)+/\S*)$",
    )
    .expect("URL pattern is valid")
});

/// Collapse every run of whitespace (newlines included) to one space and trim
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split at `.`, `!` or `?` followed by whitespace or end of text.
///
/// Punctuation stays with its sentence; a run like `?!` or `...` ends the
/// sentence after its last mark. Units are trimmed and never empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_terminal(ch) {
            continue;
        }
        match chars.peek() {
            Some(&(_, next)) if is_terminal(next) => continue,
            Some(&(_, next)) if !next.is_whitespace() => continue,
            _ => {}
        }
        let end = idx + ch.len_utf8();
        push_unit(&mut units, &text[start..end]);
        start = end;
    }
    push_unit(&mut units, &text[start..]);
    units
}

fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn push_unit<'a>(units: &mut Vec<&'a str>, unit: &'a str) {
    let unit = unit.trim();
    if !unit.is_empty() {
        units.push(unit);
    }
}

/// Whether a single token looks like a URL.
///
/// Trailing sentence punctuation and closing brackets are ignored.
pub fn looks_like_url(token: &str) -> bool {
    let token = token
        .trim_start_matches(&['(', '[', '<', '"', '\''][..])
        .trim_end_matches(&['.', ',', ';', ':', '!', '?', ')', ']', '>', '"', '\''][..]);
    !token.is_empty() && URL_RE.is_match(token)
}

/// Remove URL-looking tokens from a unit, keeping the surrounding words
pub fn strip_urls(unit: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut dropped_last = false;
    for token in unit.split_whitespace() {
        if looks_like_url(token) {
            dropped_last = true;
            continue;
        }
        kept.push(token);
        dropped_last = false;
    }

    let mut out = kept.join(" ");
    // A URL that closed the sentence took its full stop with it
    if dropped_last && !out.is_empty() {
        if let Some(last) = unit.trim_end().chars().last().filter(|c| is_terminal(*c)) {
            if !out.ends_with(is_terminal) {
                out.push(last);
            }
        }
    }
    out
}

/// Number of characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether a unit is noise: blank after URL removal, or too short
pub fn is_noise(unit: &str, min_chars: usize) -> bool {
    let cleaned = strip_urls(unit);
    cleaned.is_empty() || char_len(&cleaned) < min_chars
}

/// First `max_chars` characters of `text`; never splits a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\n b\t\tc  "), "a b c");
        assert_eq!(normalize_whitespace("\r\n\t "), "");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One is here. Two is there! Three? Four"),
            vec!["One is here.", "Two is there!", "Three?", "Four"]
        );
    }

    #[test]
    fn test_split_keeps_inner_dots() {
        assert_eq!(
            split_sentences("Version 1.80 shipped at example.com today. Next."),
            vec!["Version 1.80 shipped at example.com today.", "Next."]
        );
    }

    #[test]
    fn test_split_punctuation_runs() {
        assert_eq!(
            split_sentences("Really?! Yes... fine."),
            vec!["Really?!", "Yes...", "fine."]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" . ").len() == 1);
    }

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("http://example.com/x"));
        assert!(looks_like_url("https://news.google.com/rss?q=a"));
        assert!(looks_like_url("www.rust-lang.org"));
        assert!(looks_like_url("example.com/path"));
        assert!(looks_like_url("(https://example.com)."));
        assert!(!looks_like_url("example.com"));
        assert!(!looks_like_url("1.80"));
        assert!(!looks_like_url("hello"));
        assert!(!looks_like_url("and/or"));
    }

    #[test]
    fn test_strip_urls() {
        assert_eq!(
            strip_urls("Check this out http://example.com/x See more."),
            "Check this out See more."
        );
        assert_eq!(strip_urls("Read it at https://example.com/a."), "Read it at.");
        assert_eq!(strip_urls("https://example.com/a"), "");
    }

    #[test]
    fn test_is_noise() {
        assert!(is_noise("Ok.", 15));
        assert!(is_noise("https://example.com/a/very/long/path.", 15));
        assert!(!is_noise("This sentence is long enough.", 15));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 2), "hé");
        assert_eq!(truncate_chars(text, 8), "héllo wö");
        assert_eq!(truncate_chars(text, 50), text);
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_char_len() {
        assert_eq!(char_len("日本"), 2);
        assert_eq!(char_len(""), 0);
    }
}
