//! Framework-agnostic view trees.
//!
//! Renderers build [`Node`] trees instead of mutating a live document. A host
//! turns them into markup ([`Node::to_html`]), diffs them, or inspects them in
//! tests. Interaction is declared on elements as [`Handler`]s: the host maps
//! real events to [`Trigger`]s and feeds the resulting [`Action`] back to the
//! owning controller.

mod escape;
mod handler;

pub use escape::{escape_attr, escape_text};
pub use handler::{Action, Handler, Key, ResizeStep, Trigger};

use compact_str::CompactString;
use smallvec::SmallVec;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "base", "br", "hr", "img", "input", "link", "meta", "source",
];

/// One node of a view tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Transparent sequence of nodes, like a document fragment.
    Fragment(Vec<Node>),
}

/// An element with attributes, children and declared handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: CompactString,
    pub attrs: SmallVec<[(CompactString, String); 4]>,
    pub children: Vec<Node>,
    pub handlers: SmallVec<[Handler; 2]>,
}

// ============================================================================
// Construction
// ============================================================================

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            attrs: SmallVec::new(),
            children: Vec::new(),
            handlers: SmallVec::new(),
        }
    }

    /// Set an attribute, replacing an existing value.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.into(), value)),
        }
        self
    }

    /// Boolean attribute rendered without a value (`controls`, `muted`).
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Append one or more space-separated classes.
    pub fn class(mut self, class: &str) -> Self {
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, existing)) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            Some((_, existing)) => existing.push_str(class),
            None => self.attrs.push(("class".into(), class.to_owned())),
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn on(mut self, trigger: Trigger, action: Action) -> Self {
        self.handlers.push(Handler { trigger, action });
        self
    }

    /// Click, Enter and Space all perform `action`.
    pub fn activatable(self, action: Action) -> Self {
        self.on(Trigger::Click, action.clone())
            .on(Trigger::Key(Key::Enter), action.clone())
            .on(Trigger::Key(Key::Space), action)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Action bound to `trigger`, if any.
    pub fn action_for(&self, trigger: &Trigger) -> Option<&Action> {
        self.handlers
            .iter()
            .find(|h| &h.trigger == trigger)
            .map(|h| &h.action)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// ============================================================================
// Traversal
// ============================================================================

impl Node {
    /// Depth-first, document-order walk over every element.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        match self {
            Self::Element(el) => {
                out.push(el);
                for child in &el.children {
                    child.collect_elements(out);
                }
            }
            Self::Fragment(nodes) => {
                for node in nodes {
                    node.collect_elements(out);
                }
            }
            Self::Text(_) => {}
        }
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        self.elements().into_iter().filter(|e| e.tag == tag).collect()
    }

    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|e| e.has_class(class))
            .collect()
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Self::Fragment(nodes) => nodes.iter().for_each(|n| n.collect_text(out)),
        }
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape_text(text)),
            Self::Fragment(nodes) => nodes.iter().for_each(|n| n.write_html(out)),
            Self::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}
