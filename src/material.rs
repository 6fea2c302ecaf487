//! Material system for ray tracing.
//!
//! A closed set of three scattering behaviors: Diffuse (matte), Metal
//! (specular with optional fuzz), and Dielectric (clear glass). Scattering
//! produces a new ray plus an attenuation color, or absorbs the path.

use glam::Vec3A;

use crate::hittable::HitRecord;
use crate::random::Sampler;
use crate::ray::Ray;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Result of a successful scatter: the continuation ray and the per-channel
/// attenuation applied to the path throughput.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// The scattered continuation ray, originating at the hit point.
    pub ray: Ray,
    /// Per-channel attenuation, each channel in [0, 1].
    pub attenuation: Color,
}

/// Material variants for ray tracing.
///
/// The set is fixed and exhaustive, so scattering dispatches by `match`
/// rather than through trait objects.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    /// Diffuse material for matte surfaces.
    Diffuse {
        /// Surface color/reflectance, channels in [0, 1].
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color, channels in [0, 1].
        albedo: Color,
        /// Surface roughness in [0, 1] (0.0 = mirror).
        fuzz: f32,
    },

    /// Dielectric (transparent) material with refraction.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, etc.).
        refraction_index: f32,
    },
}

impl Material {
    /// Create a diffuse material. Albedo channels are clamped to [0, 1].
    pub fn diffuse(albedo: Color) -> Self {
        Material::Diffuse {
            albedo: albedo.clamp(Vec3A::ZERO, Vec3A::ONE),
        }
    }

    /// Create a metal material. Albedo channels and fuzz are clamped to
    /// [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo: albedo.clamp(Vec3A::ZERO, Vec3A::ONE),
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a dielectric material with the given refraction index.
    pub fn dielectric(refraction_index: f32) -> Self {
        Material::Dielectric { refraction_index }
    }

    /// Compute ray scattering for this material.
    ///
    /// Returns the scattered ray and attenuation, or `None` if the path is
    /// absorbed.
    pub fn scatter(
        &self,
        r_in: &Ray,
        rec: &HitRecord,
        sampler: &mut Sampler,
    ) -> Option<Scatter> {
        match *self {
            Material::Diffuse { albedo } => scatter_diffuse(albedo, rec, sampler),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, r_in, rec, sampler),
            Material::Dielectric { refraction_index } => {
                scatter_dielectric(refraction_index, r_in, rec, sampler)
            }
        }
    }
}

/// Diffuse scattering: bounce toward a random point in the unit sphere
/// sitting on the surface normal. Never absorbs.
fn scatter_diffuse(albedo: Color, rec: &HitRecord, sampler: &mut Sampler) -> Option<Scatter> {
    let target = rec.p + rec.normal + sampler.in_unit_sphere();
    Some(Scatter {
        ray: Ray::new(rec.p, target - rec.p),
        attenuation: albedo,
    })
}

/// Metallic reflection with optional fuzz.
///
/// Absorbs when the fuzzed direction would re-enter the surface. A mirror
/// (`fuzz == 0`) consumes no randomness.
fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    r_in: &Ray,
    rec: &HitRecord,
    sampler: &mut Sampler,
) -> Option<Scatter> {
    let mut direction = reflect(r_in.direction.normalize(), rec.normal);
    if fuzz > 0.0 {
        direction += fuzz * sampler.in_unit_sphere();
    }
    if direction.dot(rec.normal) <= 0.0 {
        return None;
    }
    Some(Scatter {
        ray: Ray::new(rec.p, direction),
        attenuation: albedo,
    })
}

/// Dielectric scattering: choose between mirror reflection and Snell
/// refraction by the Schlick reflectance, with total internal reflection
/// forcing the mirror branch. Glass is colorless, so the attenuation is
/// always white; never absorbs.
fn scatter_dielectric(
    refraction_index: f32,
    r_in: &Ray,
    rec: &HitRecord,
    sampler: &mut Sampler,
) -> Option<Scatter> {
    let d_dot_n = r_in.direction.dot(rec.normal);
    let dir_len = r_in.direction.length();

    // The geometric normal points out of the glass; the sign of d.n tells us
    // whether the ray is entering or exiting the medium.
    let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
        (
            -rec.normal,
            refraction_index,
            refraction_index * d_dot_n / dir_len,
        )
    } else {
        (rec.normal, 1.0 / refraction_index, -d_dot_n / dir_len)
    };

    let unit_direction = r_in.direction.normalize();
    let dt = unit_direction.dot(outward_normal);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);

    let reflect_prob = if discriminant > 0.0 {
        schlick(cosine, refraction_index)
    } else {
        // Total internal reflection: no refracted direction exists.
        1.0
    };

    let direction = if sampler.next_f32() < reflect_prob {
        reflect(unit_direction, rec.normal)
    } else {
        ni_over_nt * (unit_direction - outward_normal * dt) - outward_normal * discriminant.sqrt()
    };

    Some(Scatter {
        ray: Ray::new(rec.p, direction),
        attenuation: Color::ONE,
    })
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Compute Fresnel reflectance using Schlick's approximation.
pub fn schlick(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(normal: Vec3A, material: &Material) -> HitRecord<'_> {
        HitRecord {
            t: 1.0,
            p: Vec3A::ZERO,
            normal,
            material,
        }
    }

    #[test]
    fn schlick_at_normal_incidence_is_r0() {
        // (1 - c)^5 vanishes, leaving r0 = ((1 - 1.5) / (1 + 1.5))^2 = 0.04.
        assert!((schlick(1.0, 1.5) - 0.04).abs() < 1.0e-6);
    }

    #[test]
    fn mirror_metal_obeys_reflection_law() {
        let m = Material::metal(Vec3A::new(0.8, 0.8, 0.8), 0.0);
        let normal = Vec3A::new(0.0, 0.0, 1.0);
        let rec = record(normal, &m);
        let r_in = Ray::new(Vec3A::new(-1.0, 0.0, 1.0), Vec3A::new(1.0, 0.0, -1.0));

        let mut sampler = Sampler::new(5);
        let s = m.scatter(&r_in, &rec, &mut sampler).unwrap();

        let v = r_in.direction.normalize();
        assert_eq!(s.ray.direction, v - 2.0 * v.dot(normal) * normal);
        assert_eq!(s.ray.origin, rec.p);
        assert_eq!(s.attenuation, Vec3A::new(0.8, 0.8, 0.8));

        // No randomness consumed: the sampler is still in lockstep with a
        // fresh one.
        let mut untouched = Sampler::new(5);
        assert_eq!(sampler.next_f32(), untouched.next_f32());
    }

    #[test]
    fn metal_absorbs_rays_reflected_into_surface() {
        // Incoming along the normal from behind the surface reflects inward.
        let m = Material::metal(Vec3A::ONE, 0.0);
        let rec = record(Vec3A::new(0.0, 0.0, 1.0), &m);
        let r_in = Ray::new(Vec3A::new(0.0, 0.0, -1.0), Vec3A::new(0.0, 0.0, 1.0));

        let mut sampler = Sampler::new(5);
        assert!(m.scatter(&r_in, &rec, &mut sampler).is_none());
    }

    #[test]
    fn metal_fuzz_is_clamped() {
        match Material::metal(Vec3A::ONE, 5.0) {
            Material::Metal { fuzz, .. } => assert_eq!(fuzz, 1.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn albedo_is_clamped_to_unit_range() {
        match Material::diffuse(Vec3A::new(1.5, -0.2, 0.5)) {
            Material::Diffuse { albedo } => {
                assert_eq!(albedo, Vec3A::new(1.0, 0.0, 0.5));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn diffuse_scatters_from_hit_point_with_albedo() {
        let m = Material::diffuse(Vec3A::new(0.1, 0.2, 0.5));
        let rec = record(Vec3A::new(0.0, 0.0, 1.0), &m);
        let r_in = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, -1.0));

        let mut sampler = Sampler::new(9);
        let s = m.scatter(&r_in, &rec, &mut sampler).unwrap();
        assert_eq!(s.ray.origin, rec.p);
        assert_eq!(s.attenuation, Vec3A::new(0.1, 0.2, 0.5));
        // normal + point-in-unit-sphere can never reach length 2.
        assert!(s.ray.direction.length() < 2.0);
    }

    #[test]
    fn dielectric_is_colorless_and_never_absorbs() {
        let m = Material::dielectric(1.5);
        let rec = record(Vec3A::new(0.0, 0.0, 1.0), &m);
        let r_in = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, -1.0));

        for seed in 0..8 {
            let mut sampler = Sampler::new(seed);
            let s = m.scatter(&r_in, &rec, &mut sampler).unwrap();
            assert_eq!(s.attenuation, Color::ONE);
            // At normal incidence both branches stay on the z axis.
            assert!(s.ray.direction.x.abs() < 1.0e-6);
            assert!(s.ray.direction.y.abs() < 1.0e-6);
            assert!((s.ray.direction.z.abs() - 1.0).abs() < 1.0e-6);
        }
    }

    #[test]
    fn total_internal_reflection_forces_mirror() {
        // Exiting glass at well past the critical angle (~41.8 deg for 1.5).
        let m = Material::dielectric(1.5);
        let normal = Vec3A::new(0.0, 0.0, 1.0);
        let rec = record(normal, &m);
        let r_in = Ray::new(Vec3A::new(0.0, 0.0, -1.0), Vec3A::new(1.0, 0.0, 0.3));

        for seed in 0..8 {
            let mut sampler = Sampler::new(seed);
            let s = m.scatter(&r_in, &rec, &mut sampler).unwrap();
            let v = r_in.direction.normalize();
            assert_eq!(s.ray.direction, v - 2.0 * v.dot(normal) * normal);
            assert!(s.ray.direction.z < 0.0);
        }
    }
}
