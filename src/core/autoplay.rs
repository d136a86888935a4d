//! Autoplay: timer-driven slide advancement plus control-panel auto-hide.
//!
//! Both timers are `Instant` deadlines fired from `tick(engine, now)`:
//! - the repeating advance deadline, re-armed after each fire;
//! - a one-shot that hides the control panel shortly after playback starts.
//!
//! An advance that lands while the engine is mid-transition simply becomes a
//! dropped `next()` (the engine's lock policy); no queueing is needed.

use crate::core::dom::{selectors, Document};
use crate::core::engine::SlideEngine;
use crate::core::event_bus::{DeckEmitter, DeckEvent};
use log::{debug, trace};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Delay before the control panel hides after playback starts.
pub const PANEL_HIDE_DELAY: Duration = Duration::from_millis(2000);

/// Host callback fired on every playback state change.
pub type StateChangeFn = Box<dyn Fn(bool) + Send + Sync>;

/// Autoplay construction options.
pub struct AutoPlayOptions {
    /// Advance interval in milliseconds.
    pub interval_ms: u64,
    /// Stop when the last slide is reached; otherwise loop back to the first.
    pub stop_on_last: bool,
    /// Hide the control panel shortly after starting.
    pub hide_after_start: bool,
    /// Invoked with the new playing state on start/stop.
    pub on_state_change: Option<StateChangeFn>,
}

impl Default for AutoPlayOptions {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            stop_on_last: true,
            hide_after_start: true,
            on_state_change: None,
        }
    }
}

/// Drives periodic advancement through a [`SlideEngine`].
pub struct AutoPlayController {
    document: Arc<dyn Document>,
    emitter: DeckEmitter,
    interval: Duration,
    stop_on_last: bool,
    hide_after_start: bool,
    playing: bool,
    next_advance: Option<Instant>,
    hide_panel_at: Option<Instant>,
    on_state_change: Option<StateChangeFn>,
}

impl AutoPlayController {
    pub fn new(document: Arc<dyn Document>, emitter: DeckEmitter, options: AutoPlayOptions) -> Self {
        Self {
            document,
            emitter,
            interval: Duration::from_millis(options.interval_ms),
            stop_on_last: options.stop_on_last,
            hide_after_start: options.hide_after_start,
            playing: false,
            next_advance: None,
            hide_panel_at: None,
            on_state_change: options.on_state_change,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }

    /// Begin playback. No-op when already playing.
    pub fn start(&mut self, now: Instant) {
        if self.playing {
            return;
        }
        debug!("autoplay started (interval {}ms)", self.interval.as_millis());

        self.playing = true;
        self.update_toggle_button();
        if self.hide_after_start {
            self.hide_panel_at = Some(now + PANEL_HIDE_DELAY);
        }
        self.next_advance = Some(now + self.interval);
        self.notify(true);
    }

    /// Stop playback. Idempotent: a second call clears nothing and fires no
    /// duplicate callback.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        debug!("autoplay stopped");

        self.playing = false;
        self.next_advance = None;
        self.hide_panel_at = None;
        self.show_panel();
        self.update_toggle_button();
        self.notify(false);
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.playing {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Change the advance interval. While playing, restarts so the new
    /// interval takes effect immediately instead of adjusting a live deadline.
    pub fn set_speed(&mut self, ms: u64, now: Instant) {
        self.interval = Duration::from_millis(ms);

        // The selected option identifies itself by value; no ambient event.
        let value = ms.to_string();
        for button in self.document.query_all(selectors::SPEED_BUTTON) {
            let active = button.attr("data-speed").as_deref() == Some(value.as_str());
            button.set_class("active", active);
        }

        if self.playing {
            self.stop();
            self.start(now);
        }
    }

    /// Fire due timers: the panel hide one-shot and the advance deadline.
    pub fn tick(&mut self, engine: &mut SlideEngine, now: Instant) {
        if let Some(at) = self.hide_panel_at
            && now >= at
        {
            self.hide_panel_at = None;
            self.hide_panel();
        }

        if !self.playing {
            return;
        }
        let Some(at) = self.next_advance else {
            return;
        };
        if now < at {
            return;
        }

        if engine.current() + 1 < engine.total() {
            trace!("autoplay advance");
            engine.next(now);
            self.next_advance = Some(now + self.interval);
        } else if self.stop_on_last {
            self.stop();
        } else {
            trace!("autoplay wrapping to first slide");
            engine.first(now);
            self.next_advance = Some(now + self.interval);
        }
    }

    fn notify(&self, playing: bool) {
        if let Some(cb) = &self.on_state_change {
            cb(playing);
        }
        self.emitter.emit(DeckEvent::PlaybackChanged { playing });
    }

    fn update_toggle_button(&self) {
        let Some(button) = self.document.query(selectors::AUTOPLAY_TOGGLE) else {
            return;
        };
        if self.playing {
            button.set_attr("data-icon", "ph:pause-circle-bold");
            button.set_attr("aria-label", "Pause autoplay");
        } else {
            button.set_attr("data-icon", "ph:play-circle-bold");
            button.set_attr("aria-label", "Start autoplay");
        }
    }

    // Panel is looked up fresh on every call so a replaced or absent element
    // is tolerated.
    fn hide_panel(&self) {
        if let Some(panel) = self.document.query(selectors::CONTROL_PANEL) {
            panel.set_style("opacity", "0");
            panel.set_style("pointer-events", "none");
            panel.set_style("transform", "translateX(-50%) translateY(20px)");
        }
    }

    fn show_panel(&self) {
        if let Some(panel) = self.document.query(selectors::CONTROL_PANEL) {
            panel.set_style("opacity", "1");
            panel.set_style("pointer-events", "auto");
            panel.set_style("transform", "translateX(-50%) translateY(0)");
        }
    }
}
