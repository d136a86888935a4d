//! Fullscreen presentation mode.
//!
//! The browser original tried vendor-prefixed APIs in sequence; here that is
//! a chain of [`FullscreenSurface`] candidates, first available wins. The
//! controller is not authoritative over the state: `sync()` re-reads the
//! surface whenever the host reports a change, so exits triggered outside the
//! controller (e.g. an Escape press) still refresh the indicator.

use crate::core::dom::{selectors, Document};
use crate::core::event_bus::{DeckEmitter, DeckEvent};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One fullscreen capability (a concrete windowing API).
pub trait FullscreenSurface: Send + Sync {
    /// Whether this surface is usable in the current environment.
    fn available(&self) -> bool;

    /// Best-effort enter request.
    fn enter(&self);

    /// Best-effort exit request.
    fn exit(&self);

    /// Actual fullscreen state as the environment reports it.
    fn is_active(&self) -> bool;
}

/// Toggles fullscreen through the first available surface and keeps the
/// `.fullscreen-toggle` indicator in sync.
pub struct FullscreenController {
    document: Arc<dyn Document>,
    emitter: DeckEmitter,
    surfaces: Vec<Arc<dyn FullscreenSurface>>,
    active: bool,
}

impl FullscreenController {
    pub fn new(
        document: Arc<dyn Document>,
        emitter: DeckEmitter,
        surfaces: Vec<Arc<dyn FullscreenSurface>>,
    ) -> Self {
        let mut controller = Self {
            document,
            emitter,
            surfaces,
            active: false,
        };
        controller.active = controller.read_state();
        controller.update_button();
        controller
    }

    pub fn is_fullscreen(&self) -> bool {
        self.active
    }

    /// Enter if not fullscreen, else exit. Decision is made on the actual
    /// environment state, not the cached flag.
    pub fn toggle(&mut self) {
        if self.read_state() {
            self.exit();
        } else {
            self.enter();
        }
    }

    /// Request fullscreen on the first available surface. Silent no-op when
    /// no surface is available.
    pub fn enter(&mut self) {
        if let Some(surface) = self.first_available() {
            trace!("requesting fullscreen");
            surface.enter();
        } else {
            debug!("no fullscreen surface available");
        }
        self.sync();
    }

    /// Request fullscreen exit, best-effort.
    pub fn exit(&mut self) {
        if let Some(surface) = self.first_available() {
            trace!("exiting fullscreen");
            surface.exit();
        }
        self.sync();
    }

    /// Re-read the actual state and refresh the indicator. Call whenever the
    /// host reports a fullscreen change, including externally triggered ones.
    pub fn sync(&mut self) {
        let actual = self.read_state();
        if actual != self.active {
            debug!("fullscreen state changed: {}", actual);
            self.emitter.emit(DeckEvent::FullscreenChanged { active: actual });
        }
        self.active = actual;
        self.update_button();
    }

    fn first_available(&self) -> Option<&Arc<dyn FullscreenSurface>> {
        self.surfaces.iter().find(|s| s.available())
    }

    fn read_state(&self) -> bool {
        self.first_available().is_some_and(|s| s.is_active())
    }

    fn update_button(&self) {
        let Some(button) = self.document.query(selectors::FULLSCREEN_TOGGLE) else {
            return;
        };
        if self.active {
            button.set_attr("data-icon", "ph:arrows-in-bold");
            button.set_attr("aria-label", "Exit fullscreen");
        } else {
            button.set_attr("data-icon", "ph:arrows-out-bold");
            button.set_attr("aria-label", "Enter fullscreen");
        }
    }
}

/// Process-local fullscreen flag for headless runs and tests.
#[derive(Default)]
pub struct HeadlessFullscreen {
    active: AtomicBool,
}

impl HeadlessFullscreen {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Flip the state from outside the controller (simulates an Escape exit).
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl FullscreenSurface for HeadlessFullscreen {
    fn available(&self) -> bool {
        true
    }

    fn enter(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
