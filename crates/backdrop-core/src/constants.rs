/// Interaction-loop and scene tuning constants.
///
/// These express intended behavior (frame budget, smoothing, clamp limits) and
/// keep magic numbers out of the loop code.

// Capability gate: narrower viewports never get the GPU layer
pub const MIN_VIEWPORT_WIDTH_PX: f64 = 900.0;

// Frame budget (~45 Hz cap, independent of the host refresh rate)
pub const FRAME_INTERVAL_MS: f64 = 22.0;

// Exponential smoothing per committed frame; tuned against FRAME_INTERVAL_MS
pub const POINTER_SMOOTHING: f32 = 0.08;
pub const SCROLL_SMOOTHING: f32 = 0.06;

// Pointer routing
pub const POINTER_THROTTLE_MS: f64 = 24.0;
pub const TILT_MAX_X_DEG: f32 = 8.0; // from vertical offset
pub const TILT_MAX_Y_DEG: f32 = 10.0; // from horizontal offset
pub const MAGNETIC_STRENGTH_PX: f32 = 14.0; // offset at the element edge

// Scroll publishing
pub const SCROLL_DECIMALS_SCALE: f32 = 10_000.0; // 4 decimal digits

// Object fade-out as the page scrolls past the hero
pub const FADE_START: f32 = 0.35;
/// Linear ramp: scroll 0.5 leaves a factor of 0.4, full fade at 0.6.
/// See "Fade at midpoint" in DESIGN.md before changing.
pub const FADE_WIDTH: f32 = 0.25;

// Damped scroll driver
pub const DAMPED_SCROLL_LERP: f64 = 0.1;
pub const DAMPED_SCROLL_SETTLE_PX: f64 = 0.5;
pub const DAMPED_SCROLL_WHEEL_MULTIPLIER: f64 = 1.0;

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_Z: f32 = 8.0;
pub const CAMERA_POINTER_X: f32 = 0.6;
pub const CAMERA_POINTER_Y: f32 = 0.4;

// Render surface
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 1.5;

// Scene content
pub const SOLID_COUNT: usize = 3;
pub const PARTICLE_COUNT: usize = 180;
pub const PARTICLE_BOUNDS: [f32; 3] = [16.0, 10.0, 8.0]; // full box extents, centered
pub const PARTICLE_SIZE_PX: f32 = 3.0;
pub const PARTICLE_OPACITY: f32 = 0.55;
pub const PARTICLE_SEED: u64 = 42;

// Emissive modulation
pub const EMISSIVE_PULSE_AMPLITUDE: f32 = 0.08;
pub const EMISSIVE_PULSE_RATE: f32 = 1.2;
pub const EMISSIVE_SCROLL_GAIN: f32 = 0.25;

// Secondary group motion driven by smoothed scroll
pub const GROUP_SCROLL_LIFT: f32 = 1.6;
pub const GROUP_SCROLL_TURN: f32 = std::f32::consts::FRAC_PI_2;
