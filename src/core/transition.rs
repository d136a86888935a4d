//! Transition styles and their animation timings.
//!
//! Each style maps to a fixed animation duration. A settled transition is the
//! style duration plus a small settle margin, so the entering slide has fully
//! landed before the lock releases.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Extra time added on top of the style duration before a transition settles.
pub const SETTLE_MARGIN: Duration = Duration::from_millis(50);

/// Named transition animation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Fade,
    Slide,
    Cinematic,
    Cut,
    Flip,
    Zoom,
}

impl TransitionStyle {
    /// All known styles, in presentation order.
    pub const ALL: [TransitionStyle; 6] = [
        TransitionStyle::Fade,
        TransitionStyle::Slide,
        TransitionStyle::Cinematic,
        TransitionStyle::Cut,
        TransitionStyle::Flip,
        TransitionStyle::Zoom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Fade => "fade",
            TransitionStyle::Slide => "slide",
            TransitionStyle::Cinematic => "cinematic",
            TransitionStyle::Cut => "cut",
            TransitionStyle::Flip => "flip",
            TransitionStyle::Zoom => "zoom",
        }
    }

    /// Parse a style name. Unknown names yield None (callers ignore them).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fade" => Some(TransitionStyle::Fade),
            "slide" => Some(TransitionStyle::Slide),
            "cinematic" => Some(TransitionStyle::Cinematic),
            "cut" => Some(TransitionStyle::Cut),
            "flip" => Some(TransitionStyle::Flip),
            "zoom" => Some(TransitionStyle::Zoom),
            _ => None,
        }
    }

    /// Animation duration for this style.
    pub fn duration(&self) -> Duration {
        let ms = match self {
            TransitionStyle::Fade => 600,
            TransitionStyle::Slide => 500,
            TransitionStyle::Cinematic => 800,
            TransitionStyle::Cut => 50,
            TransitionStyle::Flip => 600,
            TransitionStyle::Zoom => 500,
        };
        Duration::from_millis(ms)
    }

    /// Duration until the transition settles (animation + margin).
    pub fn settle_duration(&self) -> Duration {
        self.duration() + SETTLE_MARGIN
    }
}

impl std::fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
