//! Keyboard and touch input mapping.
//!
//! Keys resolve through a binding table to a [`NavCommand`]; swipes resolve
//! through [`SwipeTracker`]. Resolution is suppressed while focus sits in a
//! text field, so typing never drives the deck.

use crate::core::engine::SlideEngine;
use log::trace;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Instant;

/// Minimum horizontal travel (in px) for a touch gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Navigation request produced by input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
}

impl NavCommand {
    /// Dispatch to the engine.
    pub fn apply(&self, engine: &mut SlideEngine, now: Instant) {
        match self {
            NavCommand::Next => engine.next(now),
            NavCommand::Prev => engine.prev(now),
            NavCommand::First => engine.first(now),
            NavCommand::Last => engine.last(now),
        }
    }
}

static DEFAULT_BINDINGS: Lazy<HashMap<&'static str, NavCommand>> = Lazy::new(|| {
    HashMap::from([
        ("ArrowRight", NavCommand::Next),
        ("ArrowDown", NavCommand::Next),
        (" ", NavCommand::Next),
        ("PageDown", NavCommand::Next),
        ("ArrowLeft", NavCommand::Prev),
        ("ArrowUp", NavCommand::Prev),
        ("PageUp", NavCommand::Prev),
        ("Home", NavCommand::First),
        ("End", NavCommand::Last),
    ])
});

/// Key-to-command binding table.
pub struct KeyMap {
    bindings: HashMap<String, NavCommand>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key press. Returns None for unbound keys and whenever focus
    /// is in a text input or textarea.
    pub fn resolve(&self, key: &str, text_input_focused: bool) -> Option<NavCommand> {
        if text_input_focused {
            return None;
        }
        let cmd = self.bindings.get(key).copied();
        if let Some(cmd) = cmd {
            trace!("key {:?} -> {:?}", key, cmd);
        }
        cmd
    }

    pub fn bind(&mut self, key: &str, command: NavCommand) {
        self.bindings.insert(key.to_string(), command);
    }

    pub fn unbind(&mut self, key: &str) {
        self.bindings.remove(key);
    }
}

/// Resolves touch gestures into swipe navigation.
///
/// A gesture navigates only when its horizontal travel exceeds both the
/// vertical travel and [`SWIPE_THRESHOLD`]. Rightward swipes go back,
/// leftward swipes go forward.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    pub fn touch_end(&mut self, x: f32, y: f32) -> Option<NavCommand> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;

        if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
            let cmd = if dx > 0.0 { NavCommand::Prev } else { NavCommand::Next };
            trace!("swipe dx={:.1} dy={:.1} -> {:?}", dx, dy, cmd);
            Some(cmd)
        } else {
            None
        }
    }
}
