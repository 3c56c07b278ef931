//! Markdown-like body formatting.
//!
//! # Syntax
//!
//! | Line                    | Block                          |
//! |-------------------------|--------------------------------|
//! | `# text`                | heading level 1                |
//! | `## text`               | heading level 2                |
//! | `* text`                | list item (consecutive = one list) |
//! | contains `http(s)://…`  | paragraph with embedded media  |
//! | anything else           | paragraph                      |
//!
//! Blank lines separate paragraph groups. A non-list line closes an open list
//! before it is emitted, and every group closes its list at the end.
//!
//! Inside paragraph and list text, `**strong**` and `_em_` spans are
//! recognized.

use super::document::paragraphs;
use super::media::{self, MediaItem, URL_PATTERN};
use crate::dom::{Element, Node};
use regex::Regex;
use std::sync::LazyLock;

/// `**strong**` and `_em_` spans.
static EMPHASIS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|\b_([^_]+)_\b").unwrap());

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Inline content of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
    /// A URL sniffed as media.
    Media(MediaItem),
    /// A URL that is not media: a plain external link.
    Link(String),
}

/// One formatted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading1(String),
    Heading2(String),
    Paragraph(Vec<Inline>),
    List(Vec<Vec<Inline>>),
    /// A line carrying URLs; rendered as a paragraph.
    Embed(Vec<Inline>),
}

// ============================================================================
// Parsing
// ============================================================================

/// Classify a body into blocks.
pub fn blocks(body: &str) -> Vec<Block> {
    let mut out = Vec::new();

    for group in paragraphs(body) {
        let mut list: Vec<Vec<Inline>> = Vec::new();

        for line in group.lines().map(str::trim) {
            if let Some(item) = line.strip_prefix("* ") {
                list.push(inlines(item));
                continue;
            }
            flush_list(&mut list, &mut out);

            if let Some(text) = line.strip_prefix("## ") {
                out.push(Block::Heading2(text.to_owned()));
            } else if let Some(text) = line.strip_prefix("# ") {
                out.push(Block::Heading1(text.to_owned()));
            } else if URL_PATTERN.is_match(line) {
                out.push(Block::Embed(embed_inlines(line)));
            } else if !line.is_empty() {
                out.push(Block::Paragraph(inlines(line)));
            }
        }
        flush_list(&mut list, &mut out);
    }

    out
}

fn flush_list(list: &mut Vec<Vec<Inline>>, out: &mut Vec<Block>) {
    if !list.is_empty() {
        out.push(Block::List(std::mem::take(list)));
    }
}

/// Split text into text and emphasis spans.
pub fn inlines(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in EMPHASIS_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Inline::Text(text[last..whole.start()].to_owned()));
        }
        if let Some(strong) = caps.get(1) {
            out.push(Inline::Strong(strong.as_str().to_owned()));
        } else if let Some(em) = caps.get(2) {
            out.push(Inline::Emphasis(em.as_str().to_owned()));
        }
        last = whole.end();
    }
    if last < text.len() {
        out.push(Inline::Text(text[last..].to_owned()));
    }
    out
}

/// Replace each URL in a line by its media item, or a link when it is not
/// media.
fn embed_inlines(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut last = 0;
    for found in URL_PATTERN.find_iter(line) {
        if found.start() > last {
            out.extend(inlines(&line[last..found.start()]));
        }
        // Sentence punctuation right after a URL is not part of it
        let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        out.push(match MediaItem::sniff(url) {
            MediaItem::Unsupported { url } => Inline::Link(url),
            item => Inline::Media(item),
        });
        last = found.start() + url.len();
    }
    if last < line.len() {
        out.extend(inlines(&line[last..]));
    }
    out
}

// ============================================================================
// Rendering
// ============================================================================

fn render_inlines(inlines: &[Inline]) -> Vec<Node> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => Node::Text(text.clone()),
            Inline::Strong(text) => Element::new("strong").text(text.as_str()).into(),
            Inline::Emphasis(text) => Element::new("em").text(text.as_str()).into(),
            Inline::Media(item) => media::render_inline(item),
            Inline::Link(url) => media::external_link(url, url).into(),
        })
        .collect()
}

pub fn render_block(block: &Block) -> Node {
    match block {
        Block::Heading1(text) => Element::new("h1").text(text.as_str()).into(),
        Block::Heading2(text) => Element::new("h2").text(text.as_str()).into(),
        Block::Paragraph(content) | Block::Embed(content) => {
            Element::new("p").children(render_inlines(content)).into()
        }
        Block::List(items) => Element::new("ul")
            .children(
                items
                    .iter()
                    .map(|item| Element::new("li").children(render_inlines(item))),
            )
            .into(),
    }
}

/// Format a body into a node fragment.
pub fn format_nodes(body: &str) -> Node {
    Node::Fragment(blocks(body).iter().map(render_block).collect())
}

/// Format a body into HTML.
pub fn format(body: &str) -> String {
    format_nodes(body).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(node: &Node) -> Vec<String> {
        match node {
            Node::Fragment(nodes) => nodes
                .iter()
                .filter_map(|n| match n {
                    Node::Element(el) => Some(el.tag.to_string()),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }

    #[test]
    fn test_block_order_list_closes_before_paragraph() {
        let node = format_nodes("# Title\n\nSome text\n\n* a\n* b\n\nMore");
        assert_eq!(tags(&node), vec!["h1", "p", "ul", "p"]);
        assert_eq!(node.find_by_tag("li").len(), 2);
        assert_eq!(
            format("# Title\n\nSome text\n\n* a\n* b\n\nMore"),
            "<h1>Title</h1><p>Some text</p><ul><li>a</li><li>b</li></ul><p>More</p>"
        );
    }

    #[test]
    fn test_list_flushed_by_non_list_line_in_same_group() {
        let out = blocks("* a\n* b\nafter\n* c");
        assert_eq!(
            out,
            vec![
                Block::List(vec![vec![Inline::Text("a".into())], vec![Inline::Text("b".into())]]),
                Block::Paragraph(vec![Inline::Text("after".into())]),
                Block::List(vec![vec![Inline::Text("c".into())]]),
            ]
        );
    }

    #[test]
    fn test_lists_in_separate_groups_stay_separate() {
        let node = format_nodes("* a\n\n* b");
        assert_eq!(node.find_by_tag("ul").len(), 2);
    }

    #[test]
    fn test_headings_strip_prefix() {
        assert_eq!(
            blocks("## Sub\n# Top"),
            vec![Block::Heading2("Sub".into()), Block::Heading1("Top".into())]
        );
        // No space after the marker: a paragraph
        assert!(matches!(blocks("#hashtag")[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_png_url_becomes_img() {
        let html = format("Look: https://cdn.example.com/shot.png");
        assert_eq!(
            html,
            r#"<p>Look: <img src="https://cdn.example.com/shot.png" alt="Embedded image" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_youtube_url_becomes_embed() {
        let node = format_nodes("https://www.youtube.com/watch?v=XYZ");
        let iframe = node.find_by_tag("iframe");
        assert_eq!(iframe.len(), 1);
        assert_eq!(
            iframe[0].get_attr("src"),
            Some("https://www.youtube.com/embed/XYZ")
        );
    }

    #[test]
    fn test_unknown_url_becomes_link() {
        let node = format_nodes("See https://example.com/about for more");
        let links = node.find_by_tag("a");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].get_attr("href"), Some("https://example.com/about"));
        assert_eq!(links[0].get_attr("target"), Some("_blank"));
        assert_eq!(links[0].get_attr("rel"), Some("noopener noreferrer"));
        assert_eq!(node.text_content(), "See https://example.com/about for more");
    }

    #[test]
    fn test_trailing_punctuation_not_in_url() {
        let html = format("Final shot: https://x.io/final.png.");
        assert!(html.contains(r#"src="https://x.io/final.png""#));
        assert!(html.ends_with(".</p>"));
    }

    #[test]
    fn test_multiple_urls_in_one_line() {
        let out = blocks("a.png https://x.io/a.png and https://x.io/b.mp4");
        let Block::Embed(inlines) = &out[0] else {
            panic!("expected embed block");
        };
        let media: Vec<_> = inlines
            .iter()
            .filter(|i| matches!(i, Inline::Media(_)))
            .collect();
        assert_eq!(media.len(), 2);
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            inlines("a **bold** and _soft_ word"),
            vec![
                Inline::Text("a ".into()),
                Inline::Strong("bold".into()),
                Inline::Text(" and ".into()),
                Inline::Emphasis("soft".into()),
                Inline::Text(" word".into()),
            ]
        );
        // Snake case identifiers are left alone
        assert_eq!(inlines("snake_case_name"), vec![Inline::Text("snake_case_name".into())]);
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(format("<script>x</script>"), "<p>&lt;script&gt;x&lt;/script&gt;</p>");
    }

    #[test]
    fn test_empty_body() {
        assert!(blocks("").is_empty());
        assert_eq!(format("  \n\n "), "");
    }
}
