//! Page renderers.
//!
//! Renderers never touch a document directly. They emit [`Node`] trees to a
//! [`Surface`] and ask it to update the address bar; the build writes what a
//! [`Capture`] surface saw, tests inspect it.
//!
//! | Module    | Page                                          |
//! |-----------|-----------------------------------------------|
//! | `list`    | generic list/detail controller                |
//! | `article` | article cards and full article view           |
//! | `project` | project page: description, media, stats       |
//! | `gallery` | project thumbnail grid (the home page)        |
//! | `panels`  | productions, skills and software panels       |

pub mod article;
pub mod gallery;
pub mod list;
pub mod panels;
pub mod project;

pub use list::{Catalog, ListRenderer, Siblings};

use crate::dom::{Element, Node};
use std::fmt;

/// Where renderers put their output.
pub trait Surface {
    /// Replace the surface content.
    fn show(&mut self, node: Node);
    /// Navigate to `location`, adding a history entry.
    fn push_url(&mut self, location: &Location);
    /// Navigate to `location` in place.
    fn replace_url(&mut self, location: &Location);
    fn scroll_to_top(&mut self);
}

// ============================================================================
// Location
// ============================================================================

/// Path plus ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            query: Vec::new(),
        }
    }

    /// Parse `path?a=1&b=2`. Undecodable components are kept verbatim.
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or(url);
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(&value.replace('+', " ")))
            })
            .collect();
        Self {
            path: path.to_owned(),
            query,
        }
    }

    pub fn get(&self, param: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == param)
            .map(|(_, value)| value.as_str())
    }

    /// Same location with `param` set, replacing any previous value.
    pub fn with_param(&self, param: &str, value: &str) -> Self {
        let mut next = self.without_param(param);
        next.query.push((param.to_owned(), value.to_owned()));
        next
    }

    pub fn without_param(&self, param: &str) -> Self {
        Self {
            path: self.path.clone(),
            query: self
                .query
                .iter()
                .filter(|(key, _)| key != param)
                .cloned()
                .collect(),
        }
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s).map_or_else(|_| s.to_owned(), |decoded| decoded.into_owned())
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{sep}{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Capture surface
// ============================================================================

/// Surface that records what it was asked to do.
#[derive(Debug, Default)]
pub struct Capture {
    pub current: Option<Node>,
    /// Every URL navigated to, pushes and replacements alike.
    pub history: Vec<Location>,
    pub shown: usize,
    pub scrolls: usize,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> String {
        self.current.as_ref().map(Node::to_html).unwrap_or_default()
    }

    pub fn location(&self) -> Option<&Location> {
        self.history.last()
    }

    /// Take the current node, leaving the surface empty.
    pub fn take(&mut self) -> Option<Node> {
        self.current.take()
    }
}

impl Surface for Capture {
    fn show(&mut self, node: Node) {
        self.current = Some(node);
        self.shown += 1;
    }

    fn push_url(&mut self, location: &Location) {
        self.history.push(location.clone());
    }

    fn replace_url(&mut self, location: &Location) {
        match self.history.last_mut() {
            Some(last) => *last = location.clone(),
            None => self.history.push(location.clone()),
        }
    }

    fn scroll_to_top(&mut self) {
        self.scrolls += 1;
    }
}

// ============================================================================
// Placeholders
// ============================================================================

pub fn loading() -> Node {
    Element::new("div").class("spinner").into()
}

pub fn message(text: &str) -> Node {
    Element::new("p").text(text).into()
}
