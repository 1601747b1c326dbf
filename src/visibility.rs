use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::pose::Pose;

/// Identity of something a ray can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: EntityId,
    pub distance: f32,
}

/// Scene collaborator answering nearest-hit raycasts.
pub trait SceneQuery {
    /// Nearest hit along `direction` (normalized) within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Center followed by the eight corners.
    pub fn sample_points(&self) -> [Vec3; 9] {
        let (min, max) = (self.min, self.max);
        [
            self.center(),
            min,
            max,
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ]
    }
}

/// Perspective parameters for the player camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            aspect: DEFAULT_ASPECT,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

/// A viewer that can project world points into its viewport.
#[derive(Clone, Copy, Debug)]
pub struct Observer {
    pub origin: Vec3,
    pub view_proj: Mat4,
}

impl Observer {
    pub fn from_pose(pose: &Pose, projection: &Projection) -> Self {
        let view = Mat4::look_to_rh(pose.position, pose.forward(), pose.up());
        Self {
            origin: pose.position,
            view_proj: projection.matrix() * view,
        }
    }

    /// Viewport coordinates of `point`: x and y in [0, 1] from the bottom-left when on
    /// screen, z is the depth in front of the observer (negative behind).
    pub fn world_to_viewport(&self, point: Vec3) -> Vec3 {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w.abs() < 1e-6 {
            return Vec3::new(0.5, 0.5, clip.w);
        }
        let ndc = clip.truncate() / clip.w;
        Vec3::new(ndc.x * 0.5 + 0.5, ndc.y * 0.5 + 0.5, clip.w)
    }
}

fn inside_viewport(viewport: Vec3) -> bool {
    viewport.z > 0.0
        && viewport.x > 0.0
        && viewport.x < 1.0
        && viewport.y > 0.0
        && viewport.y < 1.0
}

/// True if any of the target's sample points is on screen and the first thing a ray
/// toward it hits is the target itself.
pub fn is_visible_to_observer(
    scene: Option<&dyn SceneQuery>,
    observer: Option<&Observer>,
    target: EntityId,
    bounds: Option<&Aabb>,
) -> bool {
    let (Some(scene), Some(observer), Some(bounds)) = (scene, observer, bounds) else {
        return false;
    };

    for point in bounds.sample_points() {
        if !inside_viewport(observer.world_to_viewport(point)) {
            continue;
        }
        let Some(dir) = (point - observer.origin).try_normalize() else {
            continue;
        };
        if let Some(hit) = scene.raycast(observer.origin, dir, OBSERVER_RAY_RANGE)
            && hit.entity == target
        {
            return true;
        }
    }

    false
}

/// True if `target_origin` lies within the beam cone and the beam axis ray hits the target.
pub fn is_in_beam(
    scene: Option<&dyn SceneQuery>,
    beam_origin: Vec3,
    beam_forward: Vec3,
    half_angle_degrees: f32,
    range: f32,
    target_origin: Vec3,
    target: EntityId,
) -> bool {
    let Some(scene) = scene else {
        return false;
    };
    let (Some(forward), Some(to_target)) = (
        beam_forward.try_normalize(),
        (target_origin - beam_origin).try_normalize(),
    ) else {
        return false;
    };

    let angle = forward.dot(to_target).clamp(-1.0, 1.0).acos().to_degrees();
    if angle > half_angle_degrees {
        return false;
    }

    scene
        .raycast(beam_origin, forward, range)
        .is_some_and(|hit| hit.entity == target)
}
