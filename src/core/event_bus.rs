//! Deck event bus for decoupled host notification.
//!
//! Two modes work together:
//! - Immediate: subscribed callbacks fire synchronously on emit().
//! - Deferred: emitted events are also queued for poll() in the host loop.
//!
//! Callback order is FIFO (first subscribed, first called).

use crate::core::transition::TransitionStyle;
use log::warn;
use std::sync::{Arc, Mutex, RwLock};

/// Maximum events held in the deferred queue before the oldest are evicted.
const MAX_QUEUE_SIZE: usize = 256;

/// Everything the deck reports to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    /// A transition settled on a new slide.
    SlideChanged { index: usize, total: usize },
    /// Autoplay started or stopped.
    PlaybackChanged { playing: bool },
    /// The active transition style changed.
    TransitionChanged { style: TransitionStyle },
    /// Fullscreen state changed (including externally triggered exits).
    FullscreenChanged { active: bool },
}

type Callback = Arc<dyn Fn(&DeckEvent) + Send + Sync>;

#[derive(Clone, Default)]
struct Shared {
    subscribers: Arc<RwLock<Vec<Callback>>>,
    queue: Arc<Mutex<Vec<DeckEvent>>>,
}

impl Shared {
    fn emit(&self, event: DeckEvent) {
        for cb in self
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
        {
            cb(&event);
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict = queue.len() / 2;
            warn!("deck event queue full ({} events), evicting oldest {}", queue.len(), evict);
            queue.drain(0..evict);
        }
        queue.push(event);
    }
}

/// Pub/sub bus owned by the host.
#[derive(Clone, Default)]
pub struct DeckBus {
    shared: Shared,
}

impl DeckBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all deck events. The callback fires synchronously on emit.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&DeckEvent) + Send + Sync + 'static,
    {
        self.shared
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(callback));
    }

    /// Emit an event: invoke callbacks immediately and queue it for poll().
    pub fn emit(&self, event: DeckEvent) {
        self.shared.emit(event);
    }

    /// Drain all queued events for batch processing in the host loop.
    pub fn poll(&self) -> Vec<DeckEvent> {
        std::mem::take(&mut *self.shared.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn queue_len(&self) -> usize {
        self.shared.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Lightweight emitter handle for passing into the controllers.
    pub fn emitter(&self) -> DeckEmitter {
        DeckEmitter {
            inner: Some(self.shared.clone()),
        }
    }
}

/// Cloneable emitter handle. A dummy emitter (no bus attached) no-ops, so
/// controllers can be built before the host wires up events.
#[derive(Clone, Default)]
pub struct DeckEmitter {
    inner: Option<Shared>,
}

impl DeckEmitter {
    /// No-op emitter.
    pub fn dummy() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: DeckEvent) {
        if let Some(shared) = &self.inner {
            shared.emit(event);
        }
    }
}

impl std::fmt::Debug for DeckEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckEmitter")
            .field("attached", &self.inner.is_some())
            .finish()
    }
}
