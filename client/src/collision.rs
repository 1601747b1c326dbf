use glam::Vec3;
use parry3d::math::{Pose3, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::{Cuboid, TriMesh};

use nightshift::visibility::Aabb;
use nightshift::{EntityId, RayHit, SceneQuery};

/// Static walls plus axis-aligned bodies that move around (the monster).
pub struct CollisionScene {
    walls: Option<(EntityId, TriMesh)>,
    bodies: Vec<(EntityId, Vec3, Cuboid)>,
}

fn to_vector(v: Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

impl CollisionScene {
    pub fn new() -> Self {
        Self {
            walls: None,
            bodies: Vec::new(),
        }
    }

    pub fn with_walls(
        mut self,
        entity: EntityId,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
    ) -> Option<Self> {
        if vertices.is_empty() || indices.is_empty() {
            return None;
        }
        let vertices: Vec<Vector> = vertices.iter().map(|v| to_vector(*v)).collect();
        let trimesh = TriMesh::new(vertices, indices.to_vec()).ok()?;
        self.walls = Some((entity, trimesh));
        Some(self)
    }

    /// Place, move or remove (`None`) the body for `entity`.
    pub fn set_body(&mut self, entity: EntityId, bounds: Option<Aabb>) {
        self.bodies.retain(|(id, _, _)| *id != entity);
        if let Some(bounds) = bounds {
            let cuboid = Cuboid::new(to_vector(bounds.half_extents()));
            self.bodies.push((entity, bounds.center(), cuboid));
        }
    }

    fn cast_walls(&self, ray: &Ray, max_dist: f32) -> Option<RayHit> {
        let (entity, trimesh) = self.walls.as_ref()?;
        trimesh
            .cast_ray(&Pose3::IDENTITY, ray, max_dist, true)
            .map(|distance| RayHit {
                entity: *entity,
                distance,
            })
    }
}

impl Default for CollisionScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneQuery for CollisionScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let ray = Ray::new(to_vector(origin), to_vector(direction));
        let mut nearest = self.cast_walls(&ray, max_distance);

        for (entity, center, cuboid) in &self.bodies {
            // Cast in the body's local frame so it can stay axis-aligned at the origin.
            let local = Ray::new(to_vector(origin - *center), to_vector(direction));
            let Some(distance) = cuboid.cast_ray(&Pose3::IDENTITY, &local, max_distance, true) else {
                continue;
            };
            if nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    entity: *entity,
                    distance,
                });
            }
        }

        nearest
    }
}
