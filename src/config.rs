// Timers
pub const TIMER_EPSILON: f64 = 1e-4; // seconds of slack when a timer is compared to its duration

// Camera slots
pub const TRANSITION_COOLDOWN: f32 = 1.0; // seconds between accepted slot requests
pub const SNAP_DISTANCE: f32 = 0.05; // world units
pub const SNAP_ANGLE_DEGREES: f32 = 1.0;
pub const DEFAULT_MOVE_SPEED: f32 = 3.0;
pub const DEFAULT_ROTATE_SPEED: f32 = 3.0;

// Observer
pub const DEFAULT_FOV_Y_DEGREES: f32 = 60.0;
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;
pub const OBSERVER_RAY_RANGE: f32 = 100.0;

// Flashlight
pub const FULL_CHARGE: f32 = 100.0;
pub const BASE_DRAIN_PER_SECOND: f32 = 0.3;
pub const DRAIN_PER_NIGHT: f32 = 0.1;
pub const BEAM_HALF_ANGLE_DEGREES: f32 = 30.0;
pub const BEAM_RANGE: f32 = 50.0;
pub const HOLD_OFFSET: [f32; 3] = [-0.3, -0.2, -0.2]; // right, up, forward
pub const BEAM_COLOR: [f32; 4] = [1.0, 0.95, 0.8, 1.0];

// Monster
pub const IGNORE_THRESHOLD: f32 = 5.0; // seconds unobserved before advancing
pub const SPAWN_CHANCE: f32 = 35.0; // percent
pub const SPAWN_CYCLE_INTERVAL: f32 = 60.0;
pub const APPEAR_DURATION: f32 = 30.0;
pub const LIT_DRAIN_PER_SECOND: f32 = 5.0; // extra drain while the beam is on the monster
pub const MONSTER_HALF_EXTENTS: [f32; 3] = [0.4, 0.9, 0.3];

// Ritual
pub const FINISH_WINDOW: f32 = 15.0;
pub const RITUAL_WAIT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const RITUAL_READY_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

// Session
pub const DEFAULT_SEED: u64 = 0x6e69_6768_7473;
