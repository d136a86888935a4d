//! Injected document surface.
//!
//! The engine never talks to a concrete UI toolkit. It queries an abstract
//! [`Document`] for elements by selector and mutates them through the
//! [`Element`] trait (classes, inline styles, attributes, text). Every lookup
//! is optional: a missing element is a silent no-op, never an error.
//!
//! [`MemoryDocument`] is the in-crate implementation used by the rehearsal
//! binary and the tests. It records exactly the state the engine writes, which
//! makes assertions on settled/in-flight slides straightforward.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Selectors forming the document contract. Everything except `SLIDE` is
/// optional; a deck without dots, counter or panel still plays.
pub mod selectors {
    pub const SLIDE: &str = ".slide";
    pub const VIEWPORT: &str = ".slides-viewport";
    pub const NAV_DOT: &str = ".nav-dot";
    pub const COUNTER: &str = ".slide-counter";
    pub const PROGRESS_BAR: &str = ".progress-bar";
    pub const STYLE_BUTTON: &str = ".style-btn";
    pub const CONTROL_PANEL: &str = ".control-panel";
    pub const AUTOPLAY_TOGGLE: &str = ".autoplay-toggle";
    pub const SPEED_BUTTON: &str = ".speed-control button";
    pub const FULLSCREEN_TOGGLE: &str = ".fullscreen-toggle";
}

/// Shared handle to a document element.
pub type ElementHandle = Arc<dyn Element>;

/// Mutable element surface (class list, inline styles, attributes, text).
///
/// Methods take `&self`; implementations use interior mutability so handles
/// can be shared between the engine and the host.
pub trait Element: Send + Sync {
    /// Add or remove a single class.
    fn set_class(&self, class: &str, on: bool);

    fn has_class(&self, class: &str) -> bool;

    /// Replace the entire class list with a space-separated value.
    fn set_class_name(&self, value: &str);

    fn set_style(&self, prop: &str, value: &str);

    fn style(&self, prop: &str) -> Option<String>;

    fn set_text(&self, text: &str);

    fn text(&self) -> String;

    fn set_attr(&self, name: &str, value: &str);

    fn attr(&self, name: &str) -> Option<String>;
}

/// Element lookup capability.
pub trait Document: Send + Sync {
    /// First element matching the selector, if any.
    fn query(&self, selector: &str) -> Option<ElementHandle>;

    /// All elements matching the selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementHandle>;
}

#[derive(Default)]
struct ElementState {
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    attrs: BTreeMap<String, String>,
    text: String,
}

/// In-memory element: a bag of classes, styles, attributes and text.
#[derive(Default)]
pub struct MemoryElement {
    state: RwLock<ElementState>,
}

impl MemoryElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// New element pre-populated with attributes (e.g. `data-style`).
    pub fn with_attrs(attrs: &[(&str, &str)]) -> Arc<Self> {
        let el = Self::new();
        for (name, value) in attrs {
            el.set_attr(name, value);
        }
        el
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ElementState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ElementState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Element for MemoryElement {
    fn set_class(&self, class: &str, on: bool) {
        let mut state = self.write();
        if on {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.read().classes.contains(class)
    }

    fn set_class_name(&self, value: &str) {
        let mut state = self.write();
        state.classes = value.split_whitespace().map(str::to_string).collect();
    }

    fn set_style(&self, prop: &str, value: &str) {
        self.write().styles.insert(prop.to_string(), value.to_string());
    }

    fn style(&self, prop: &str) -> Option<String> {
        self.read().styles.get(prop).cloned()
    }

    fn set_text(&self, text: &str) {
        self.write().text = text.to_string();
    }

    fn text(&self) -> String {
        self.read().text.clone()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.write().attrs.insert(name.to_string(), value.to_string());
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.read().attrs.get(name).cloned()
    }
}

/// In-memory document: elements registered under the selector that finds them.
///
/// Selector matching is exact-key (no CSS engine); the engine only ever uses a
/// fixed set of class selectors, so registration keys double as the contract.
#[derive(Default, Clone)]
pub struct MemoryDocument {
    elements: Arc<RwLock<Vec<(String, Arc<MemoryElement>)>>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element under a selector key. Returns the handle for
    /// further setup.
    pub fn insert(&self, selector: &str, element: Arc<MemoryElement>) -> Arc<MemoryElement> {
        self.elements
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((selector.to_string(), element.clone()));
        element
    }

    /// Shorthand: register a fresh element under a selector key.
    pub fn add(&self, selector: &str) -> Arc<MemoryElement> {
        self.insert(selector, MemoryElement::new())
    }
}

impl Document for MemoryDocument {
    fn query(&self, selector: &str) -> Option<ElementHandle> {
        self.elements
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|(key, _)| key == selector)
            .map(|(_, el)| el.clone() as ElementHandle)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementHandle> {
        self.elements
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(key, _)| key == selector)
            .map(|(_, el)| el.clone() as ElementHandle)
            .collect()
    }
}
