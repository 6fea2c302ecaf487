//! Sphere primitive for ray tracing.

use glam::Vec3A;
use thiserror::Error;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Error raised when constructing a sphere with an unusable radius.
#[derive(Debug, Error, PartialEq)]
pub enum SphereError {
    /// The normal computation divides by the radius, so a zero or non-finite
    /// radius would put NaN/inf normals into the render.
    #[error("sphere radius must be finite and non-zero, got {0}")]
    InvalidRadius(f32),
}

/// Sphere primitive defined by center, radius, and material.
///
/// The radius may be negative: the geometry is identical but the surface
/// normal points inward, which is the mechanism used to build hollow glass
/// shells out of a sphere pair. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Signed radius of the sphere. Never zero.
    pub radius: f32,

    /// Material properties determining light interaction.
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Rejects zero and non-finite radii at construction time so the
    /// intersection code can divide by the radius unguarded.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Result<Self, SphereError> {
        if radius == 0.0 || !radius.is_finite() {
            return Err(SphereError::InvalidRadius(radius));
        }
        Ok(Self {
            center,
            radius,
            material,
        })
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = r.origin - self.center;

        // Quadratic a*t^2 + 2b*t + c = 0. The direction is not normalized,
        // so `a` is not simply 1.
        let a = r.direction.length_squared();
        let b = oc.dot(r.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Prefer the nearer root, fall back to the farther one.
        let mut root = (-b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = r.at(root);
        Some(HitRecord {
            t: root,
            p,
            // Dividing by the signed radius flips the normal inward for
            // negative-radius (hollow shell) spheres.
            normal: (p - self.center) / self.radius,
            material: &self.material,
        })
    }
}
