use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World position plus orientation. Forward is `rotation * -Z`, up is `+Y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default = "identity")]
    pub rotation: Quat,
}

fn identity() -> Quat {
    Quat::IDENTITY
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Pose at `position` facing `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, look_rotation(position, target))
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Orientation facing from `from` toward `to` with `+Y` as up.
pub fn look_rotation(from: Vec3, to: Vec3) -> Quat {
    let Some(forward) = (to - from).try_normalize() else {
        return Quat::IDENTITY;
    };

    let right = forward.cross(Vec3::Y);
    if right.length_squared() < 1e-8 {
        // Looking straight up or down: no stable roll, take the shortest arc.
        return Quat::from_rotation_arc(Vec3::NEG_Z, forward);
    }
    let right = right.normalize();
    let up = right.cross(forward);

    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}

/// Angle between two orientations, in degrees.
pub fn angle_degrees(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}
