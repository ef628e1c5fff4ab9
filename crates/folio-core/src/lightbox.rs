//! Fullscreen image viewer state.
//!
//! The lightbox walks the visible, ordered tiles of a listing. Navigation
//! wraps at both ends. Opening an image resets zoom and rotation.

use crate::event::{Event, Key};
use serde::{Deserialize, Serialize};

/// Horizontal swipe distance (px) that counts as prev/next.
pub const SWIPE_NAV_THRESHOLD: f32 = 50.0;

/// Upward-to-downward swipe distance (px) that closes the viewer.
pub const SWIPE_CLOSE_THRESHOLD: f32 = 100.0;

/// Actions the viewer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightboxAction {
    /// Close the viewer
    Close,
    /// Previous image
    Prev,
    /// Next image
    Next,
    /// Toggle zoom
    Zoom,
    /// Rotate by 90 degrees
    Rotate,
    /// Toggle browser fullscreen
    Fullscreen,
    /// Download the current image
    Download,
}

impl LightboxAction {
    /// Map a key press to an action.
    #[must_use]
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Escape => Some(Self::Close),
            Key::Left => Some(Self::Prev),
            Key::Right => Some(Self::Next),
            Key::Space => Some(Self::Zoom),
            k if k.is_char_ignore_case('r') => Some(Self::Rotate),
            k if k.is_char_ignore_case('f') => Some(Self::Fullscreen),
            k if k.is_char_ignore_case('d') => Some(Self::Download),
            _ => None,
        }
    }

    /// Map a finished swipe to an action.
    ///
    /// `dx`/`dy` are start minus end. Swiping left moves to the next image,
    /// swiping right to the previous one.
    #[must_use]
    pub fn from_swipe(dx: f32, dy: f32) -> Option<Self> {
        if dx.abs() > dy.abs() {
            if dx > SWIPE_NAV_THRESHOLD {
                return Some(Self::Next);
            }
            if dx < -SWIPE_NAV_THRESHOLD {
                return Some(Self::Prev);
            }
        }
        if dy > SWIPE_CLOSE_THRESHOLD {
            return Some(Self::Close);
        }
        None
    }

    /// Map any event to an action.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::KeyDown { key } => Self::from_key(*key),
            Event::Swipe { dx, dy } => Self::from_swipe(*dx, *dy),
            Event::Click { .. } => None,
        }
    }
}

/// Viewer state over a list of `len` visible items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lightbox {
    current: Option<usize>,
    zoomed: bool,
    rotation: u16,
}

impl Lightbox {
    /// Create a closed viewer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            zoomed: false,
            rotation: 0,
        }
    }

    /// Open at `index`. Returns `false` if it is out of range.
    pub fn open_at(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.current = Some(index);
        self.zoomed = false;
        self.rotation = 0;
        true
    }

    /// Close the viewer.
    pub fn close(&mut self) {
        self.current = None;
        self.zoomed = false;
        self.rotation = 0;
    }

    /// Whether the viewer is showing something.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Index of the shown item.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move to the next item, wrapping to the first.
    pub fn next(&mut self, len: usize) -> Option<usize> {
        let current = self.current?;
        if len == 0 {
            self.close();
            return None;
        }
        let next = if current + 1 >= len { 0 } else { current + 1 };
        self.open_at(next, len);
        Some(next)
    }

    /// Move to the previous item, wrapping to the last.
    pub fn prev(&mut self, len: usize) -> Option<usize> {
        let current = self.current?;
        if len == 0 {
            self.close();
            return None;
        }
        let prev = if current == 0 || current > len { len - 1 } else { current - 1 };
        self.open_at(prev, len);
        Some(prev)
    }

    /// Toggle zoom. Returns the new state.
    pub fn toggle_zoom(&mut self) -> bool {
        self.zoomed = !self.zoomed;
        self.zoomed
    }

    /// Whether the image is zoomed.
    #[must_use]
    pub const fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// Rotate by 90 degrees clockwise. Returns the new angle.
    pub fn rotate(&mut self) -> u16 {
        self.rotation = (self.rotation + 90) % 360;
        self.rotation
    }

    /// Current rotation in degrees.
    #[must_use]
    pub const fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Position label such as `3 / 12`.
    #[must_use]
    pub fn counter_label(&self, len: usize) -> Option<String> {
        self.current.map(|i| format!("{} / {len}", i + 1))
    }

    /// Apply a navigation or view action. `Fullscreen` and `Download` are
    /// left to the caller and return `false`.
    pub fn apply(&mut self, action: LightboxAction, len: usize) -> bool {
        if !self.is_open() {
            return false;
        }
        match action {
            LightboxAction::Close => {
                self.close();
                true
            }
            LightboxAction::Prev => self.prev(len).is_some(),
            LightboxAction::Next => self.next(len).is_some(),
            LightboxAction::Zoom => {
                self.toggle_zoom();
                true
            }
            LightboxAction::Rotate => {
                self.rotate();
                true
            }
            LightboxAction::Fullscreen | LightboxAction::Download => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_at_bounds() {
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.open_at(3, 3));
        assert!(!lightbox.is_open());
        assert!(lightbox.open_at(2, 3));
        assert_eq!(lightbox.current(), Some(2));
    }

    #[test]
    fn test_next_wraps() {
        let mut lightbox = Lightbox::new();
        lightbox.open_at(1, 3);
        assert_eq!(lightbox.next(3), Some(2));
        assert_eq!(lightbox.next(3), Some(0));
    }

    #[test]
    fn test_prev_wraps() {
        let mut lightbox = Lightbox::new();
        lightbox.open_at(0, 3);
        assert_eq!(lightbox.prev(3), Some(2));
        assert_eq!(lightbox.prev(3), Some(1));
    }

    #[test]
    fn test_navigation_when_closed() {
        let mut lightbox = Lightbox::new();
        assert_eq!(lightbox.next(3), None);
        assert_eq!(lightbox.prev(3), None);
    }

    #[test]
    fn test_navigation_after_list_shrinks() {
        let mut lightbox = Lightbox::new();
        lightbox.open_at(4, 5);
        assert_eq!(lightbox.next(2), Some(0));
        lightbox.open_at(4, 5);
        assert_eq!(lightbox.prev(2), Some(1));
        assert_eq!(lightbox.next(0), None);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_zoom_and_rotation_reset_on_open() {
        let mut lightbox = Lightbox::new();
        lightbox.open_at(0, 2);
        assert!(lightbox.toggle_zoom());
        assert_eq!(lightbox.rotate(), 90);
        lightbox.next(2);
        assert!(!lightbox.is_zoomed());
        assert_eq!(lightbox.rotation(), 0);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut lightbox = Lightbox::new();
        for _ in 0..3 {
            lightbox.rotate();
        }
        assert_eq!(lightbox.rotate(), 0);
    }

    #[test]
    fn test_counter_label() {
        let mut lightbox = Lightbox::new();
        assert_eq!(lightbox.counter_label(12), None);
        lightbox.open_at(2, 12);
        assert_eq!(lightbox.counter_label(12).as_deref(), Some("3 / 12"));
    }

    #[test]
    fn test_action_from_key() {
        assert_eq!(LightboxAction::from_key(Key::Escape), Some(LightboxAction::Close));
        assert_eq!(LightboxAction::from_key(Key::Left), Some(LightboxAction::Prev));
        assert_eq!(LightboxAction::from_key(Key::Right), Some(LightboxAction::Next));
        assert_eq!(LightboxAction::from_key(Key::Space), Some(LightboxAction::Zoom));
        assert_eq!(LightboxAction::from_key(Key::Char('R')), Some(LightboxAction::Rotate));
        assert_eq!(LightboxAction::from_key(Key::Char('f')), Some(LightboxAction::Fullscreen));
        assert_eq!(LightboxAction::from_key(Key::Char('d')), Some(LightboxAction::Download));
        assert_eq!(LightboxAction::from_key(Key::Char('x')), None);
        assert_eq!(LightboxAction::from_key(Key::Enter), None);
    }

    #[test]
    fn test_action_from_swipe() {
        assert_eq!(LightboxAction::from_swipe(80.0, 10.0), Some(LightboxAction::Next));
        assert_eq!(LightboxAction::from_swipe(-80.0, 10.0), Some(LightboxAction::Prev));
        assert_eq!(LightboxAction::from_swipe(30.0, 5.0), None);
        assert_eq!(LightboxAction::from_swipe(10.0, 150.0), Some(LightboxAction::Close));
        assert_eq!(LightboxAction::from_swipe(10.0, 60.0), None);
    }

    #[test]
    fn test_action_from_event() {
        assert_eq!(
            LightboxAction::from_event(&Event::key(Key::Right)),
            Some(LightboxAction::Next)
        );
        assert_eq!(
            LightboxAction::from_event(&Event::Swipe { dx: -60.0, dy: 0.0 }),
            Some(LightboxAction::Prev)
        );
    }

    #[test]
    fn test_apply() {
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.apply(LightboxAction::Next, 3));

        lightbox.open_at(0, 3);
        assert!(lightbox.apply(LightboxAction::Next, 3));
        assert_eq!(lightbox.current(), Some(1));
        assert!(lightbox.apply(LightboxAction::Zoom, 3));
        assert!(lightbox.is_zoomed());
        assert!(!lightbox.apply(LightboxAction::Download, 3));
        assert!(lightbox.apply(LightboxAction::Close, 3));
        assert!(!lightbox.is_open());
    }
}
