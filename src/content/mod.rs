//! Site content: text formats, manifests and the body formatter.
//!
//! | Module     | Input                                         |
//! |------------|-----------------------------------------------|
//! | `document` | `<title>---<body>` articles, plain lists      |
//! | `manifest` | `articles.json` / `projects.txt`              |
//! | `project`  | `description.txt`, `stats.txt`                |
//! | `media`    | `media.txt`, inline media URLs                |
//! | `panels`   | `productions.txt`, `recommendations.txt`      |
//! | `format`   | article bodies → view nodes                   |

pub mod document;
pub mod format;
pub mod manifest;
pub mod media;
pub mod panels;
pub mod project;

pub use document::{Document, parse, parse_list};
pub use format::format;
pub use manifest::ManifestEntry;
pub use media::{MediaEntry, MediaItem};
pub use project::{ProjectDescription, Stat};

use crate::fetch::{Payload, is_json_url};

/// Parse a manifest resource; JSON when `is_json`, else a plain slug list.
pub fn parse_manifest(raw: &str, is_json: bool) -> Vec<ManifestEntry> {
    if is_json {
        serde_json::from_str(raw)
            .map(manifest::from_json)
            .unwrap_or_default()
    } else {
        manifest::from_text(raw)
    }
}

/// Manifest entries from an already decoded fetch payload.
pub fn manifest_from_payload(url: &str, payload: Payload) -> Vec<ManifestEntry> {
    match payload {
        Payload::Json(value) => manifest::from_json(value),
        Payload::Text(text) => parse_manifest(&text, is_json_url(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_manifest_both_forms() {
        let json = parse_manifest(r#"[{"slug": "a"}, "b"]"#, true);
        assert_eq!(json.len(), 2);
        let text = parse_manifest("a\nb\n\nc", false);
        assert_eq!(text.len(), 3);
        assert!(parse_manifest("not json", true).is_empty());
    }

    #[test]
    fn test_manifest_from_payload() {
        let entries = manifest_from_payload("m.json", Payload::Json(json!(["x"])));
        assert_eq!(entries[0].slug, "x");
        let entries = manifest_from_payload("projects.txt", Payload::Text("p\nq".into()));
        assert_eq!(entries.len(), 2);
    }
}
