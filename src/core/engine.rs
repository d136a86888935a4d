//! Slide transition state machine.
//!
//! **Architecture**: SlideEngine owns the ordered slide sequence and the
//! single-active-slide invariant. Navigation is funneled through `go_to`,
//! which arms an in-flight transition; `tick(now)` finalizes it once the
//! animation deadline passes. While a transition is in flight every other
//! navigation call is dropped, never queued.
//!
//! # Timing model
//!
//! No async wait: the animation duration is an `Instant` deadline checked by
//! the host's tick loop. Callers pass `now` explicitly, so tests drive
//! virtual time.

use crate::core::dom::{selectors, Document, ElementHandle};
use crate::core::event_bus::{DeckEmitter, DeckEvent};
use crate::core::prefs::PrefStore;
use crate::core::transition::TransitionStyle;
use log::{debug, trace};
use std::sync::Arc;
use std::time::Instant;

/// Host callback fired after every settled transition: `(new_index, total)`.
pub type SlideChangeFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Engine construction options.
#[derive(Default)]
pub struct EngineOptions {
    /// Style used when nothing is persisted.
    pub default_transition: TransitionStyle,
    /// Invoked after every settled transition.
    pub on_slide_change: Option<SlideChangeFn>,
}

/// An armed transition between two slides.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    from: usize,
    to: usize,
    settle_at: Instant,
}

/// Slide visibility/transition state machine over an injected document.
pub struct SlideEngine {
    document: Arc<dyn Document>,
    prefs: Arc<dyn PrefStore>,
    emitter: DeckEmitter,
    slides: Vec<ElementHandle>,
    current: usize,
    total: usize,
    style: TransitionStyle,
    in_flight: Option<InFlight>,
    on_slide_change: Option<SlideChangeFn>,
}

impl SlideEngine {
    /// Read the slide sequence once, activate slide 0, and pick up the
    /// persisted transition style (falling back to the configured default).
    pub fn new(
        document: Arc<dyn Document>,
        prefs: Arc<dyn PrefStore>,
        emitter: DeckEmitter,
        options: EngineOptions,
    ) -> Self {
        let slides = document.query_all(selectors::SLIDE);
        let total = slides.len();
        let style = prefs
            .transition_style()
            .unwrap_or(options.default_transition);
        debug!("deck loaded: {} slides, transition {}", total, style);

        let engine = Self {
            document,
            prefs,
            emitter,
            slides,
            current: 0,
            total,
            style,
            in_flight: None,
            on_slide_change: options.on_slide_change,
        };
        engine.reset_slide_states();
        engine.refresh_nav();
        engine
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn style(&self) -> TransitionStyle {
        self.style
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Begin a transition to `index`. Silently dropped when the index is out
    /// of range, already current, or another transition is in flight.
    pub fn go_to(&mut self, index: usize, now: Instant) {
        if index >= self.total || index == self.current {
            return;
        }
        if self.in_flight.is_some() {
            trace!("go_to({}) dropped: transition in flight", index);
            return;
        }

        trace!("transition {} -> {} ({})", self.current, index, self.style);

        // The viewport class carries the animation family for the host's CSS.
        if let Some(viewport) = self.document.query(selectors::VIEWPORT) {
            viewport.set_class_name(&format!("slides-viewport transition-{}", self.style));
        }

        let entering = &self.slides[index];
        entering.set_style("visibility", "visible");
        entering.set_class("slide-entering", true);

        let leaving = &self.slides[self.current];
        leaving.set_class("slide-leaving", true);

        self.in_flight = Some(InFlight {
            from: self.current,
            to: index,
            settle_at: now + self.style.settle_duration(),
        });
    }

    /// Finalize an in-flight transition once its deadline has passed.
    /// Returns the new index when a transition settled on this tick.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let flight = self.in_flight?;
        if now < flight.settle_at {
            return None;
        }

        let leaving = &self.slides[flight.from];
        leaving.set_style("visibility", "hidden");
        leaving.set_style("opacity", "0");
        leaving.set_class("slide-active", false);
        leaving.set_class("slide-leaving", false);

        let entering = &self.slides[flight.to];
        entering.set_class("slide-entering", false);
        entering.set_class("slide-active", true);
        entering.set_style("opacity", "1");
        entering.set_style("visibility", "visible");

        self.current = flight.to;
        self.in_flight = None;
        self.refresh_nav();

        debug!("settled on slide {}/{}", self.current + 1, self.total);
        if let Some(cb) = &self.on_slide_change {
            cb(self.current, self.total);
        }
        self.emitter.emit(DeckEvent::SlideChanged {
            index: self.current,
            total: self.total,
        });
        Some(self.current)
    }

    /// Advance one slide. No-op at the last slide (edges never wrap).
    pub fn next(&mut self, now: Instant) {
        if self.current + 1 < self.total {
            self.go_to(self.current + 1, now);
        }
    }

    /// Go back one slide. No-op at the first slide.
    pub fn prev(&mut self, now: Instant) {
        if self.current > 0 {
            self.go_to(self.current - 1, now);
        }
    }

    pub fn first(&mut self, now: Instant) {
        self.go_to(0, now);
    }

    pub fn last(&mut self, now: Instant) {
        if self.total > 0 {
            self.go_to(self.total - 1, now);
        }
    }

    /// Validate, adopt and persist a transition style. Unknown names are
    /// ignored.
    pub fn set_transition(&mut self, name: &str) {
        let Some(style) = TransitionStyle::parse(name) else {
            debug!("ignoring unknown transition style {:?}", name);
            return;
        };

        self.style = style;
        self.prefs.set_transition_style(style);

        for button in self.document.query_all(selectors::STYLE_BUTTON) {
            let active = button.attr("data-style").as_deref() == Some(style.as_str());
            button.set_class("active", active);
        }
        self.emitter.emit(DeckEvent::TransitionChanged { style });
    }

    /// Put every slide into its settled construction state: slide 0 active
    /// and visible, the rest hidden.
    fn reset_slide_states(&self) {
        for (index, slide) in self.slides.iter().enumerate() {
            if index == 0 {
                slide.set_class("slide-active", true);
                slide.set_style("visibility", "visible");
                slide.set_style("opacity", "1");
            } else {
                slide.set_class("slide-active", false);
                slide.set_style("visibility", "hidden");
                slide.set_style("opacity", "0");
            }
        }
    }

    /// Refresh navigation indicators: dots, counter text, progress width.
    /// Each is optional; absent elements are skipped.
    fn refresh_nav(&self) {
        for (index, dot) in self.document.query_all(selectors::NAV_DOT).iter().enumerate() {
            dot.set_class("active", index == self.current);
        }

        if let Some(counter) = self.document.query(selectors::COUNTER) {
            counter.set_text(&format!("{} / {}", self.current + 1, self.total));
        }

        if let Some(progress) = self.document.query(selectors::PROGRESS_BAR) {
            if self.total > 0 {
                let percent = (self.current + 1) as f64 / self.total as f64 * 100.0;
                progress.set_style("width", &format!("{}%", percent));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::{Element, MemoryDocument, MemoryElement};
    use crate::core::prefs::MemoryPrefs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Fixture {
        doc: MemoryDocument,
        slides: Vec<Arc<MemoryElement>>,
    }

    fn deck(count: usize) -> Fixture {
        let doc = MemoryDocument::new();
        doc.add(selectors::VIEWPORT);
        let slides: Vec<_> = (0..count).map(|_| doc.add(selectors::SLIDE)).collect();
        for _ in 0..count {
            doc.add(selectors::NAV_DOT);
        }
        doc.add(selectors::COUNTER);
        doc.add(selectors::PROGRESS_BAR);
        Fixture { doc, slides }
    }

    fn engine_with(fixture: &Fixture, options: EngineOptions) -> SlideEngine {
        SlideEngine::new(
            Arc::new(fixture.doc.clone()),
            Arc::new(MemoryPrefs::new()),
            DeckEmitter::dummy(),
            options,
        )
    }

    fn engine(fixture: &Fixture) -> SlideEngine {
        engine_with(fixture, EngineOptions::default())
    }

    fn settle(engine: &mut SlideEngine, start: Instant) -> Instant {
        let settled = start + engine.style().settle_duration();
        engine.tick(settled);
        settled
    }

    #[test]
    fn test_construction_activates_first_slide() {
        let fixture = deck(3);
        let engine = engine(&fixture);

        assert_eq!(engine.current(), 0);
        assert_eq!(engine.total(), 3);
        assert!(fixture.slides[0].has_class("slide-active"));
        assert_eq!(fixture.slides[0].style("opacity").as_deref(), Some("1"));
        for slide in &fixture.slides[1..] {
            assert!(!slide.has_class("slide-active"));
            assert_eq!(slide.style("visibility").as_deref(), Some("hidden"));
            assert_eq!(slide.style("opacity").as_deref(), Some("0"));
        }
    }

    #[test]
    fn test_persisted_style_wins_over_default() {
        let fixture = deck(2);
        let engine = SlideEngine::new(
            Arc::new(fixture.doc.clone()),
            Arc::new(MemoryPrefs::with_style(TransitionStyle::Zoom)),
            DeckEmitter::dummy(),
            EngineOptions {
                default_transition: TransitionStyle::Cinematic,
                on_slide_change: None,
            },
        );
        assert_eq!(engine.style(), TransitionStyle::Zoom);
    }

    #[test]
    fn test_go_to_out_of_range_is_noop() {
        let fixture = deck(3);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        engine.go_to(3, t0);
        engine.go_to(99, t0);
        assert_eq!(engine.current(), 0);
        assert!(!engine.is_transitioning());
    }

    #[test]
    fn test_go_to_current_is_noop() {
        let fixture = deck(3);
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let mut engine = engine_with(
            &fixture,
            EngineOptions {
                default_transition: TransitionStyle::Fade,
                on_slide_change: Some(Box::new(move |_, _| {
                    h.fetch_add(1, Ordering::SeqCst);
                })),
            },
        );
        let t0 = Instant::now();

        engine.go_to(0, t0);
        assert!(!engine.is_transitioning());
        engine.tick(t0 + Duration::from_secs(5));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_transition_settles_after_deadline() {
        let fixture = deck(3);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        engine.go_to(1, t0);
        assert!(engine.is_transitioning());
        assert_eq!(engine.current(), 0);

        // In flight: entering is visible and marked, leaving marked
        assert!(fixture.slides[1].has_class("slide-entering"));
        assert_eq!(fixture.slides[1].style("visibility").as_deref(), Some("visible"));
        assert!(fixture.slides[0].has_class("slide-leaving"));

        // Before the deadline nothing settles (fade = 600ms + 50ms margin)
        assert_eq!(engine.tick(t0 + Duration::from_millis(600)), None);
        assert!(engine.is_transitioning());

        assert_eq!(engine.tick(t0 + Duration::from_millis(650)), Some(1));
        assert_eq!(engine.current(), 1);
        assert!(!engine.is_transitioning());
        assert!(fixture.slides[1].has_class("slide-active"));
        assert!(!fixture.slides[1].has_class("slide-entering"));
        assert!(!fixture.slides[0].has_class("slide-active"));
        assert!(!fixture.slides[0].has_class("slide-leaving"));
        assert_eq!(fixture.slides[0].style("visibility").as_deref(), Some("hidden"));
    }

    #[test]
    fn test_overlapping_go_to_dropped() {
        let fixture = deck(4);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        engine.go_to(1, t0);
        engine.go_to(2, t0 + Duration::from_millis(100));
        engine.go_to(3, t0 + Duration::from_millis(200));

        let settled = settle(&mut engine, t0);
        assert_eq!(engine.current(), 1);
        // Nothing else was queued
        assert_eq!(engine.tick(settled + Duration::from_secs(1)), None);
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_single_active_invariant_after_settle() {
        let fixture = deck(5);
        let mut engine = engine(&fixture);
        let mut now = Instant::now();

        for target in [2usize, 4, 1] {
            engine.go_to(target, now);
            now = settle(&mut engine, now);
            let active: Vec<usize> = fixture
                .slides
                .iter()
                .enumerate()
                .filter(|(_, s)| s.has_class("slide-active"))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(active, vec![target]);
            assert_eq!(engine.current(), target);
        }
    }

    #[test]
    fn test_next_at_last_slide_does_not_wrap() {
        let fixture = deck(2);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        engine.go_to(1, t0);
        let now = settle(&mut engine, t0);

        engine.next(now);
        assert!(!engine.is_transitioning());
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_prev_at_first_slide_is_noop() {
        let fixture = deck(2);
        let mut engine = engine(&fixture);
        engine.prev(Instant::now());
        assert!(!engine.is_transitioning());
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_first_and_last() {
        let fixture = deck(4);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        engine.last(t0);
        let now = settle(&mut engine, t0);
        assert_eq!(engine.current(), 3);

        engine.first(now);
        settle(&mut engine, now);
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_nav_indicators_follow_current() {
        let fixture = deck(5);
        let mut engine = engine(&fixture);
        let t0 = Instant::now();

        let counter = fixture.doc.query(selectors::COUNTER).unwrap();
        let progress = fixture.doc.query(selectors::PROGRESS_BAR).unwrap();
        assert_eq!(counter.text(), "1 / 5");
        assert_eq!(progress.style("width").as_deref(), Some("20%"));

        engine.go_to(2, t0);
        settle(&mut engine, t0);

        assert_eq!(counter.text(), "3 / 5");
        assert_eq!(progress.style("width").as_deref(), Some("60%"));
        let dots = fixture.doc.query_all(selectors::NAV_DOT);
        assert!(dots[2].has_class("active"));
        assert!(!dots[0].has_class("active"));
    }

    #[test]
    fn test_missing_indicators_are_tolerated() {
        // Bare deck: slides only, no viewport/dots/counter/progress
        let doc = MemoryDocument::new();
        doc.add(selectors::SLIDE);
        doc.add(selectors::SLIDE);
        let mut engine = SlideEngine::new(
            Arc::new(doc),
            Arc::new(MemoryPrefs::new()),
            DeckEmitter::dummy(),
            EngineOptions::default(),
        );
        let t0 = Instant::now();
        engine.go_to(1, t0);
        settle(&mut engine, t0);
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_set_transition_persists_valid_style() {
        let fixture = deck(2);
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = SlideEngine::new(
            Arc::new(fixture.doc.clone()),
            prefs.clone(),
            DeckEmitter::dummy(),
            EngineOptions::default(),
        );

        engine.set_transition("flip");
        assert_eq!(engine.style(), TransitionStyle::Flip);
        assert_eq!(prefs.transition_style(), Some(TransitionStyle::Flip));
        assert_eq!(engine.style().duration(), Duration::from_millis(600));
    }

    #[test]
    fn test_set_transition_ignores_bogus_style() {
        let fixture = deck(2);
        let prefs = Arc::new(MemoryPrefs::new());
        let mut engine = SlideEngine::new(
            Arc::new(fixture.doc.clone()),
            prefs.clone(),
            DeckEmitter::dummy(),
            EngineOptions::default(),
        );

        engine.set_transition("bogus");
        assert_eq!(engine.style(), TransitionStyle::Fade);
        assert_eq!(prefs.transition_style(), None);
    }

    #[test]
    fn test_set_transition_updates_style_buttons() {
        let fixture = deck(2);
        let fade_btn = fixture
            .doc
            .insert(selectors::STYLE_BUTTON, MemoryElement::with_attrs(&[("data-style", "fade")]));
        let zoom_btn = fixture
            .doc
            .insert(selectors::STYLE_BUTTON, MemoryElement::with_attrs(&[("data-style", "zoom")]));

        let mut engine = engine(&fixture);
        engine.set_transition("zoom");
        assert!(zoom_btn.has_class("active"));
        assert!(!fade_btn.has_class("active"));
    }

    #[test]
    fn test_viewport_class_encodes_style() {
        let fixture = deck(2);
        let mut engine = engine(&fixture);
        engine.set_transition("cinematic");
        engine.go_to(1, Instant::now());

        let viewport = fixture.doc.query(selectors::VIEWPORT).unwrap();
        assert!(viewport.has_class("slides-viewport"));
        assert!(viewport.has_class("transition-cinematic"));
    }

    #[test]
    fn test_slide_change_callback_fires_on_settle() {
        let fixture = deck(3);
        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let s = Arc::clone(&seen);
        let mut engine = engine_with(
            &fixture,
            EngineOptions {
                default_transition: TransitionStyle::Cut,
                on_slide_change: Some(Box::new(move |index, total| {
                    assert_eq!(total, 3);
                    s.store(index, Ordering::SeqCst);
                })),
            },
        );

        let t0 = Instant::now();
        engine.go_to(2, t0);
        assert_eq!(seen.load(Ordering::SeqCst), usize::MAX);
        // cut = 50ms + 50ms margin
        engine.tick(t0 + Duration::from_millis(100));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_deck_is_inert() {
        let doc = MemoryDocument::new();
        let mut engine = SlideEngine::new(
            Arc::new(doc),
            Arc::new(MemoryPrefs::new()),
            DeckEmitter::dummy(),
            EngineOptions::default(),
        );
        let t0 = Instant::now();
        engine.next(t0);
        engine.last(t0);
        engine.first(t0);
        assert_eq!(engine.total(), 0);
        assert!(!engine.is_transitioning());
    }
}
