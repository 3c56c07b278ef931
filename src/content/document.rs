//! The `<title>---<body>` text format.

/// Separator between title and body.
pub const SEPARATOR: &str = "---";
/// Title used when the blob has none.
pub const DEFAULT_TITLE: &str = "Untitled";
/// Body used when the blob has none.
pub const DEFAULT_BODY: &str = "No content";

/// A parsed title/body pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub body: String,
}

impl Document {
    /// First paragraph of the body, cut to `max_chars` with a `...` marker.
    pub fn snippet(&self, max_chars: usize) -> String {
        snippet(&self.body, max_chars)
    }

    /// Estimated reading time in whole minutes.
    pub fn reading_time(&self, words_per_minute: usize) -> usize {
        reading_time(&self.body, words_per_minute)
    }
}

/// Parse `<title>---<body>`.
///
/// Everything before the first `---` is the title; everything after it,
/// further separators included, is the body. A blob without any separator
/// has no title: it becomes the body under [`DEFAULT_TITLE`].
pub fn parse(raw: &str) -> Document {
    let (title, body) = match raw.split_once(SEPARATOR) {
        Some((title, body)) => (title.trim(), body.trim()),
        None => ("", raw.trim()),
    };

    Document {
        title: non_empty_or(title, DEFAULT_TITLE),
        body: non_empty_or(body, DEFAULT_BODY),
    }
}

/// Split a plain list on newlines, trimming and dropping blank lines.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Split on blank-line boundaries (empty or whitespace-only lines).
///
/// Groups are returned untrimmed; empty groups are dropped.
pub fn paragraphs(body: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(&body[s..end]);
            }
        } else {
            start.get_or_insert(offset);
            end = offset + content.len();
        }
        offset += line.len();
    }
    if let Some(s) = start {
        out.push(&body[s..end]);
    }
    out
}

/// First paragraph cut to `max_chars` characters.
///
/// A cut paragraph is trimmed and suffixed with `...`; one that fits is
/// returned as is.
pub fn snippet(body: &str, max_chars: usize) -> String {
    let first = paragraphs(body).first().copied().unwrap_or(body);
    if first.chars().count() > max_chars {
        let cut: String = first.chars().take(max_chars).collect();
        format!("{}...", cut.trim())
    } else {
        first.to_owned()
    }
}

/// `ceil(words / words_per_minute)`, never below one minute.
pub fn reading_time(body: &str, words_per_minute: usize) -> usize {
    let words = body.split_whitespace().count().max(1);
    words.div_ceil(words_per_minute.max(1))
}

fn non_empty_or(s: &str, default: &str) -> String {
    if s.is_empty() { default } else { s }.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_and_body() {
        let doc = parse("  Hello World \n---\n Body text \n");
        assert_eq!(doc.title, "Hello World");
        assert_eq!(doc.body, "Body text");
    }

    #[test]
    fn test_parse_rejoins_later_separators() {
        let doc = parse("Title---first---second --- third");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.body, "first---second --- third");
    }

    #[test]
    fn test_parse_empty() {
        let doc = parse("");
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.body, "No content");
    }

    #[test]
    fn test_parse_without_separator_is_all_body() {
        let doc = parse("Only Title");
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.body, "Only Title");
    }

    #[test]
    fn test_parse_empty_parts_default() {
        assert_eq!(parse("---body").title, "Untitled");
        assert_eq!(parse("Title---  ").body, "No content");
        let doc = parse("---");
        assert_eq!((doc.title.as_str(), doc.body.as_str()), ("Untitled", "No content"));
    }

    #[test]
    fn test_parse_list() {
        let list = parse_list("robot\n\n  ship  \r\n\t\nforest\n");
        assert_eq!(list, vec!["robot", "ship", "forest"]);
        assert!(parse_list("   \n\n").is_empty());
    }

    #[test]
    fn test_paragraphs_split_on_whitespace_lines() {
        let body = "one\ntwo\n   \nthree\n\n\n\nfour";
        assert_eq!(paragraphs(body), vec!["one\ntwo", "three", "four"]);
    }

    #[test]
    fn test_paragraphs_crlf() {
        assert_eq!(paragraphs("a\r\n\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_snippet_short_paragraph_untouched() {
        assert_eq!(snippet("Short intro.\n\nMore text.", 150), "Short intro.");
    }

    #[test]
    fn test_snippet_truncates_with_ellipsis() {
        let body = "word ".repeat(40);
        let s = snippet(&body, 12);
        assert_eq!(s, "word word wo...");
    }

    #[test]
    fn test_snippet_counts_chars_not_bytes() {
        let body = "ééééé";
        assert_eq!(snippet(body, 5), "ééééé");
        assert_eq!(snippet(body, 3), "ééé...");
    }

    #[test]
    fn test_reading_time_minimum_one() {
        assert_eq!(reading_time("", 200), 1);
        assert_eq!(reading_time("word", 200), 1);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let body = "w ".repeat(200);
        assert_eq!(reading_time(&body, 200), 1);
        let body = "w ".repeat(201);
        assert_eq!(reading_time(&body, 200), 2);
    }
}
