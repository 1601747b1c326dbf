//! Configuration errors.
//!
//! Nothing in the per-tick path fails: rejected commands and missing collaborators
//! degrade to no-ops. Only building a session from a bad [`SessionConfig`] is an error.
//!
//! [`SessionConfig`]: crate::session::SessionConfig

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("camera graph needs at least one slot")]
    NoSlots,

    #[error("adjacency table has {table} rows but there are {slots} slots")]
    AdjacencySize { table: usize, slots: usize },

    #[error("slot {from} lists unreachable target {to} (only {slots} slots)")]
    AdjacencyOutOfRange { from: usize, to: usize, slots: usize },

    #[error("slot {slot} has non-positive {field} ({value})")]
    NonPositiveSpeed {
        slot: usize,
        field: &'static str,
        value: f32,
    },

    #[error("{role} slot {slot} is out of range (only {slots} slots)")]
    SlotOutOfRange {
        role: &'static str,
        slot: usize,
        slots: usize,
    },

    #[error("invalid projection: {0}")]
    Projection(&'static str),

    #[error("invalid flashlight setting: {0}")]
    Flashlight(&'static str),

    #[error("invalid monster setting: {0}")]
    Monster(&'static str),
}
