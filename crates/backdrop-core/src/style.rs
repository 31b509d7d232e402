//! Page-wide style-variable sink.
//!
//! The web front end writes CSS custom properties; tests record the writes.

/// Identity of an element registered at scan time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

pub trait StyleSink {
    /// Write a custom property on the document root.
    fn set_root_var(&mut self, name: &str, value: &str);
    /// Write a custom property on one registered element.
    fn set_element_var(&mut self, element: ElementId, name: &str, value: &str);
}

// Root variables
pub const VAR_SCROLL: &str = "--scroll";
pub const VAR_POINTER_X_PX: &str = "--mouse-x";
pub const VAR_POINTER_Y_PX: &str = "--mouse-y";
pub const VAR_POINTER_X: &str = "--pointer-x";
pub const VAR_POINTER_Y: &str = "--pointer-y";

// Per-element variables
pub const VAR_TILT_X: &str = "--tilt-x";
pub const VAR_TILT_Y: &str = "--tilt-y";
pub const VAR_GLOW_X: &str = "--glow-x";
pub const VAR_GLOW_Y: &str = "--glow-y";
pub const VAR_MAGNET_X: &str = "--magnet-x";
pub const VAR_MAGNET_Y: &str = "--magnet-y";

#[inline]
pub fn deg(v: f32) -> String {
    format!("{:.2}deg", v)
}

#[inline]
pub fn px(v: f32) -> String {
    format!("{:.2}px", v)
}

#[inline]
pub fn percent(v: f32) -> String {
    format!("{:.2}%", v)
}
