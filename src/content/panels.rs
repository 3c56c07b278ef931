//! Block lists for the side panels: productions and recommendations.
//!
//! Both files are blocks separated by `---`, one field per line.

use super::document::SEPARATOR;
use crate::log;

/// A shipped production credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub title: String,
    pub company: String,
    pub time: String,
    pub thumbnail: String,
    pub description: String,
}

/// A recommendation quote shown in the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub name: String,
    pub avatar: Option<String>,
    pub position: String,
    pub date: String,
    pub quote: String,
}

/// Non-empty, non-comment lines of each block.
fn blocks(raw: &str) -> impl Iterator<Item = Vec<&str>> {
    raw.split(SEPARATOR)
        .map(|block| {
            block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
}

/// Parse `productions.txt`: exactly five lines per block
/// (`title, company, time, thumbnail, description`). Other blocks are skipped.
pub fn parse_productions(raw: &str) -> Vec<Production> {
    blocks(raw)
        .enumerate()
        .filter_map(|(index, lines)| match lines.as_slice() {
            [title, company, time, thumbnail, description] => Some(Production {
                title: (*title).to_owned(),
                company: (*company).to_owned(),
                time: (*time).to_owned(),
                thumbnail: (*thumbnail).to_owned(),
                description: (*description).to_owned(),
            }),
            _ => {
                log!("warn"; "skipping malformed production {index}: expected 5 lines, got {}", lines.len());
                None
            }
        })
        .collect()
}

/// Parse `recommendations.txt`: `name, [avatar], position, date, quote`.
///
/// The avatar is present iff the second line starts with `http`. Lines past
/// the quote continue it.
pub fn parse_recommendations(raw: &str) -> Vec<Recommendation> {
    blocks(raw)
        .enumerate()
        .filter_map(|(index, lines)| {
            let has_avatar = lines.get(1).is_some_and(|line| line.starts_with("http"));
            let fields = if has_avatar { &lines[2..] } else { lines.get(1..)? };

            let [position, date, quote @ ..] = fields else {
                log!("warn"; "skipping incomplete recommendation {index}");
                return None;
            };
            if quote.is_empty() {
                log!("warn"; "skipping recommendation {index} without a quote");
                return None;
            }

            Some(Recommendation {
                name: lines[0].to_owned(),
                avatar: has_avatar.then(|| lines[1].to_owned()),
                position: (*position).to_owned(),
                date: (*date).to_owned(),
                quote: quote.join(" "),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_productions() {
        let raw = "\
Game One
Studio A
2021 - 2022
thumbs/one.jpg
Environment art.
---
# draft, incomplete
Game Two
Studio B
---

Game Three
Studio C
2023
thumbs/three.jpg
# internal note
Props and weapons.
";
        let productions = parse_productions(raw);
        assert_eq!(productions.len(), 2);
        assert_eq!(productions[0].title, "Game One");
        assert_eq!(productions[0].time, "2021 - 2022");
        assert_eq!(productions[1].company, "Studio C");
        assert_eq!(productions[1].description, "Props and weapons.");
    }

    #[test]
    fn test_parse_productions_empty() {
        assert!(parse_productions("").is_empty());
        assert!(parse_productions("---\n---").is_empty());
    }

    #[test]
    fn test_parse_recommendations_with_and_without_avatar() {
        let raw = "\
Ada
https://img.example.com/ada.png
Lead Artist
March 2024
Great to work with.
---
Bob
Producer
May 2023
Reliable.
Always on time.
";
        let recs = parse_recommendations(raw);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].avatar.as_deref(), Some("https://img.example.com/ada.png"));
        assert_eq!(recs[0].position, "Lead Artist");
        assert_eq!(recs[0].quote, "Great to work with.");
        assert_eq!(recs[1].avatar, None);
        assert_eq!(recs[1].position, "Producer");
        assert_eq!(recs[1].date, "May 2023");
        assert_eq!(recs[1].quote, "Reliable. Always on time.");
    }

    #[test]
    fn test_parse_recommendations_skips_incomplete() {
        let recs = parse_recommendations("Solo\n---\nName\nRole\nDate\n---\nA\nB\nC\nD");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "A");
        assert_eq!(recs[0].quote, "D");
    }
}
