//! Auxiliary page effects that consume the loop's state: typed per-element
//! configuration scanned once from the DOM, a typewriter state machine, and a
//! reveal-on-visibility tracker.

use crate::style::ElementId;
use fnv::FnvHashSet;

pub const ATTR_SMOOTH_SCROLL: &str = "data-smooth-scroll";
pub const ATTR_TILT: &str = "data-tilt";
pub const ATTR_MAGNETIC: &str = "data-magnetic";
pub const ATTR_REVEAL: &str = "data-reveal";
pub const ATTR_TYPEWRITER: &str = "data-typewriter";
pub const ATTR_TYPEWRITER_DELAY: &str = "data-typewriter-delay";
pub const ATTR_TYPEWRITER_SPEED: &str = "data-typewriter-speed";
pub const ATTR_MOTION: &str = "data-motion";

/// CSS selector matching every element the scan cares about.
pub const EFFECT_SELECTOR: &str =
    "[data-tilt],[data-magnetic],[data-reveal],[data-typewriter]";

/// Stamped on scanned elements so observer entries map back to their id.
pub const ATTR_EFFECT_ID: &str = "data-effect-id";
pub const REVEAL_CLASS: &str = "is-visible";
pub const REVEAL_THRESHOLD: f64 = 0.15;

pub const TYPEWRITER_DEFAULT_SPEED_MS: u32 = 45;
pub const TYPEWRITER_TICK_MS: i32 = 30;

/// Page-wide options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageConfig {
    pub smooth_scroll: bool,
}

impl PageConfig {
    pub fn from_attributes(attr: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            smooth_scroll: attr(ATTR_SMOOTH_SCROLL).is_some_and(|v| v != "false"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterConfig {
    pub text: String,
    pub delay_ms: u32,
    pub speed_ms: u32,
}

/// Everything the runtime needs to know about one opted-in element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectTarget {
    pub id: ElementId,
    pub tilt: bool,
    pub magnetic: bool,
    pub reveal: bool,
    pub typewriter: Option<TypewriterConfig>,
    /// `data-motion="force"`: animate even under reduced motion.
    pub force_motion: bool,
}

impl EffectTarget {
    /// Build from an attribute lookup. `text_content` supplies the typewriter
    /// text when `data-typewriter` carries no value.
    pub fn from_attributes(
        id: ElementId,
        attr: impl Fn(&str) -> Option<String>,
        text_content: impl FnOnce() -> Option<String>,
    ) -> Self {
        let typewriter = attr(ATTR_TYPEWRITER).map(|v| {
            let text = if v.is_empty() {
                text_content().unwrap_or_default()
            } else {
                v
            };
            TypewriterConfig {
                text,
                delay_ms: parse_ms(attr(ATTR_TYPEWRITER_DELAY)).unwrap_or(0),
                speed_ms: parse_ms(attr(ATTR_TYPEWRITER_SPEED))
                    .unwrap_or(TYPEWRITER_DEFAULT_SPEED_MS)
                    .max(1),
            }
        });
        Self {
            id,
            tilt: attr(ATTR_TILT).is_some(),
            magnetic: attr(ATTR_MAGNETIC).is_some(),
            reveal: attr(ATTR_REVEAL).is_some(),
            typewriter,
            force_motion: attr(ATTR_MOTION).as_deref() == Some("force"),
        }
    }

    pub fn motion_allowed(&self, reduced_motion_requested: bool) -> bool {
        !reduced_motion_requested || self.force_motion
    }
}

#[inline]
fn parse_ms(v: Option<String>) -> Option<u32> {
    v.and_then(|s| s.trim().parse::<u32>().ok())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypewriterState {
    Idle,
    /// Number of characters currently shown.
    Typing(usize),
    Done,
}

#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    len: usize,
    delay_ms: f64,
    speed_ms: f64,
    clock_ms: f64,
    state: TypewriterState,
}

impl Typewriter {
    pub fn new(cfg: &TypewriterConfig) -> Self {
        Self {
            len: cfg.text.chars().count(),
            text: cfg.text.clone(),
            delay_ms: cfg.delay_ms as f64,
            speed_ms: cfg.speed_ms.max(1) as f64,
            clock_ms: 0.0,
            state: TypewriterState::Idle,
        }
    }

    pub fn state(&self) -> TypewriterState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TypewriterState::Done
    }

    /// Text currently visible.
    pub fn visible(&self) -> &str {
        let shown = match self.state {
            TypewriterState::Idle => 0,
            TypewriterState::Typing(n) => n,
            TypewriterState::Done => self.len,
        };
        match self.text.char_indices().nth(shown) {
            Some((i, _)) => &self.text[..i],
            None => &self.text,
        }
    }

    /// Skip straight to the full text (reduced motion).
    pub fn finish(&mut self) -> &str {
        self.state = TypewriterState::Done;
        &self.text
    }

    /// Stop without further output; the visible text stays as it is.
    pub fn cancel(&mut self) {
        if let TypewriterState::Typing(n) = self.state {
            self.len = n;
        } else if self.state == TypewriterState::Idle {
            self.len = 0;
        }
        self.state = TypewriterState::Done;
    }

    /// Advance by `dt_ms`. Returns the visible text when it changed.
    pub fn advance(&mut self, dt_ms: f64) -> Option<&str> {
        if self.state == TypewriterState::Done {
            return None;
        }
        self.clock_ms += dt_ms.max(0.0);
        if self.state == TypewriterState::Idle {
            if self.clock_ms < self.delay_ms {
                return None;
            }
            self.clock_ms -= self.delay_ms;
            self.state = TypewriterState::Typing(0);
        }
        let TypewriterState::Typing(before) = self.state else {
            return None;
        };
        let mut shown = before;
        while shown < self.len && self.clock_ms >= self.speed_ms {
            self.clock_ms -= self.speed_ms;
            shown += 1;
        }
        self.state = if shown >= self.len {
            TypewriterState::Done
        } else {
            TypewriterState::Typing(shown)
        };
        if shown != before || self.state == TypewriterState::Done {
            Some(self.visible())
        } else {
            None
        }
    }
}

/// Elements waiting for their first intersection.
#[derive(Debug, Default)]
pub struct RevealTracker {
    pending: FnvHashSet<ElementId>,
}

impl RevealTracker {
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            pending: ids.into_iter().collect(),
        }
    }

    /// True exactly once per element: on its first intersection.
    pub fn on_intersect(&mut self, id: ElementId, intersecting: bool) -> bool {
        intersecting && self.pending.remove(&id)
    }

    /// Reveal everything now (reduced motion). Sorted for stable output.
    pub fn reveal_all(&mut self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self.pending.drain().collect();
        ids.sort();
        ids
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }
}
