//! Encounter and progression logic for a camera-slot horror game: slot navigation,
//! flashlight and battery, the ignore-and-advance monster, the timed ritual and the
//! night difficulty curve. Everything is advanced by `tick(dt)` from an outside frame loop.

pub mod battery;
pub mod camera;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod flashlight;
pub mod monster;
pub mod pose;
pub mod ritual;
pub mod session;
pub mod timer;
pub mod visibility;

pub use error::ConfigError;
pub use session::{Command, GameEvent, Renderable, Session, SessionConfig, SessionStatus};
pub use visibility::{EntityId, RayHit, SceneQuery};
