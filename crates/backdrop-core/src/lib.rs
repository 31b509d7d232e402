pub mod capability;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lifecycle;
pub mod pointer;
pub mod runtime;
pub mod scene;
pub mod scroll;
pub mod shader;
pub mod state;
pub mod style;

pub use capability::{should_enable_visuals, Capabilities};
pub use config::{LoopConfig, SmoothingPair};
pub use error::{BuildError, Degradation, DenyReason, DrawError};
pub use frame::{FrameScheduler, TickOutcome};
pub use lifecycle::{FrameHandle, HostScheduler, Lifecycle, LoopHandles, ObserverHandle, TimerHandle};
pub use runtime::Backdrop;
pub use scene::{SceneBackend, SceneGraph, SceneObjects, SceneResource};
pub use shader::{BACKDROP_WGSL, SCENE_WGSL};
pub use state::{InputTargets, RenderState};
pub use style::{ElementId, StyleSink};
