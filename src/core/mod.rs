//! Core engine modules - transitions, autoplay, input, fullscreen, events
//!
//! These modules form the deck playback engine, independent of any host UI.

pub mod autoplay;
pub mod dom;
pub mod engine;
pub mod event_bus;
pub mod fullscreen;
pub mod input;
pub mod prefs;
pub mod transition;

// Re-exports for convenience
pub use autoplay::{AutoPlayController, AutoPlayOptions};
pub use dom::{Document, Element, ElementHandle, MemoryDocument, MemoryElement};
pub use engine::{EngineOptions, SlideEngine};
pub use event_bus::{DeckBus, DeckEmitter, DeckEvent};
pub use fullscreen::{FullscreenController, FullscreenSurface, HeadlessFullscreen};
pub use input::{KeyMap, NavCommand, SwipeTracker};
pub use prefs::{FilePrefs, MemoryPrefs, PrefStore};
pub use transition::TransitionStyle;
