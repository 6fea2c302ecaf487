//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives, HitRecord for
//! intersection data, and the Scene aggregate that reports the nearest hit
//! across its members.

use glam::Vec3A;

use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Ray-object intersection information.
///
/// The normal is the geometric surface normal `(p - center) / radius`, always
/// unit length. For a negative-radius sphere it points into the sphere, which
/// is how hollow glass shells are modeled; the dielectric scatter code reads
/// the entry/exit side off the sign of `dot(direction, normal)`.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the intersection
    pub t: f32,
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Unit surface normal at the intersection point
    pub normal: Vec3A,
    /// Material of the hit primitive, borrowed from the scene
    pub material: &'a Material,
}

/// Trait for objects that can be intersected by rays.
pub trait Hittable {
    /// Test for ray intersection within the given parameter range.
    ///
    /// Returns the hit record for the nearest intersection with
    /// `ray_t.surrounds(t)`, or `None` on a miss.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// Insertion-ordered collection of spheres forming a scene.
///
/// Uses linear traversal for intersection testing; the scene owns its
/// spheres and therefore every material a hit record can refer to. Read-only
/// while a render is in flight.
#[derive(Debug, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
        }
    }

    /// Add a sphere to the scene.
    pub fn add(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Number of spheres in the scene.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// True if the scene holds no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut closest_hit = None;

        // Shrink the acceptable range to the best t found so far, so the
        // last accepted record is the globally nearest hit.
        for sphere in &self.spheres {
            if let Some(rec) = sphere.hit(r, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest_hit = Some(rec);
            }
        }

        closest_hit
    }
}
