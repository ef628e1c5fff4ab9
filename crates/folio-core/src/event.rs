//! Input events routed to the overlay manager and lightbox.

use crate::overlay::OverlayId;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Key pressed at document level
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Click on part of an overlay
    Click {
        /// What was clicked
        target: ClickTarget,
    },
    /// Touch swipe finished
    Swipe {
        /// Horizontal travel (start minus end, positive = swipe left)
        dx: f32,
        /// Vertical travel (start minus end, positive = swipe up)
        dy: f32,
    },
}

impl Event {
    /// Shorthand for a key-down event.
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Shorthand for a click event.
    #[must_use]
    pub const fn click(target: ClickTarget) -> Self {
        Self::Click { target }
    }
}

/// The part of an overlay a click landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickTarget {
    /// The backdrop itself, outside the dialog body
    Backdrop(OverlayId),
    /// The overlay's close button
    CloseButton(OverlayId),
    /// Inside the dialog body
    Content(OverlayId),
}

/// Keys the site reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Escape key
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space bar
    Space,
    /// Enter key
    Enter,
    /// Any other printable character
    Char(char),
    /// Anything else
    Other,
}

impl Key {
    /// Convert a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            " " | "Spacebar" => Self::Space,
            "Enter" => Self::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// Whether this is a character key matching `c` in either case.
    #[must_use]
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        matches!(self, Self::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_key_named() {
        assert_eq!(Key::from_dom_key("Escape"), Key::Escape);
        assert_eq!(Key::from_dom_key("ArrowLeft"), Key::Left);
        assert_eq!(Key::from_dom_key("ArrowRight"), Key::Right);
        assert_eq!(Key::from_dom_key(" "), Key::Space);
        assert_eq!(Key::from_dom_key("Enter"), Key::Enter);
    }

    #[test]
    fn test_from_dom_key_chars() {
        assert_eq!(Key::from_dom_key("r"), Key::Char('r'));
        assert_eq!(Key::from_dom_key("R"), Key::Char('R'));
        assert_eq!(Key::from_dom_key("Shift"), Key::Other);
        assert_eq!(Key::from_dom_key(""), Key::Other);
    }

    #[test]
    fn test_is_char_ignore_case() {
        assert!(Key::Char('F').is_char_ignore_case('f'));
        assert!(Key::Char('f').is_char_ignore_case('f'));
        assert!(!Key::Escape.is_char_ignore_case('f'));
    }

    #[test]
    fn test_event_json_shape() {
        let event = Event::key(Key::Escape);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"KeyDown":{"key":"Escape"}}"#);
    }
}
