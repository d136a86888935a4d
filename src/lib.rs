//! DECKPLAY - Presentation deck playback engine library
//!
//! Slide transition state machine, autoplay timing, input mapping and
//! fullscreen control over an injected document surface.

// Core engine (transitions, autoplay, input, fullscreen, events)
pub mod core;

// App modules
pub mod cli;
pub mod config;

// Re-export commonly used types from core
pub use crate::core::autoplay::{AutoPlayController, AutoPlayOptions, StateChangeFn};
pub use crate::core::dom::{selectors, Document, Element, ElementHandle, MemoryDocument, MemoryElement};
pub use crate::core::engine::{EngineOptions, SlideChangeFn, SlideEngine};
pub use crate::core::event_bus::{DeckBus, DeckEmitter, DeckEvent};
pub use crate::core::fullscreen::{FullscreenController, FullscreenSurface, HeadlessFullscreen};
pub use crate::core::input::{KeyMap, NavCommand, SwipeTracker, SWIPE_THRESHOLD};
pub use crate::core::prefs::{FilePrefs, MemoryPrefs, PrefStore};
pub use crate::core::transition::{TransitionStyle, SETTLE_MARGIN};
