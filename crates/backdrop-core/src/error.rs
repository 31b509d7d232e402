use thiserror::Error;

/// Why scene construction failed. The caller degrades to "visuals disabled".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("render surface is missing")]
    SurfaceMissing,
    #[error("no graphics context: {0}")]
    ContextUnavailable(String),
    #[error("device request failed: {0}")]
    DeviceRequest(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    ReducedMotion,
    NarrowViewport,
}

/// Conditions absorbed locally by the loop. None of these reach the page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Degradation {
    #[error("visuals skipped: {0:?}")]
    CapabilityDenied(DenyReason),
    #[error("visuals disabled, surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("resources already released")]
    ResourceAlreadyReleased,
    #[error("callback fired after teardown")]
    StaleCallbackFired,
}

impl From<BuildError> for Degradation {
    fn from(e: BuildError) -> Self {
        Degradation::SurfaceUnavailable(e.to_string())
    }
}
