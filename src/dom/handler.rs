//! Declared interaction on view elements.

/// Keys the controllers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Char(char),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Self> {
        Some(match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return None,
                }
            }
        })
    }

    /// Enter and Space activate focused controls.
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Click,
    Key(Key),
    PointerLeave,
}

/// What an interaction asks the owning controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the detail view for a slug/folder.
    Open(String),
    /// Return from a detail view to its list.
    Back,
    /// Show carousel slide `n`.
    Select(usize),
    /// Expand or collapse a truncated description.
    ToggleDescription,
    /// Move to the previous (`-1`) or next (`1`) project.
    Step(i32),
    /// Resume carousel autoplay.
    ResumeAutoplay,
    /// Change the gallery thumbnail size.
    ResizeThumbnails(ResizeStep),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStep {
    Grow,
    Shrink,
    Reset,
}

/// One trigger/action binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub trigger: Trigger,
    pub action: Action,
}
