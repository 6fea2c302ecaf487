//! Core path tracing renderer.
//!
//! Drives the per-sample bounce loop, shades misses with the sky gradient,
//! and runs the per-frame pixel loop in parallel over image rows. The
//! rendered frame is held as linear color in a [`Film`] and converted to
//! RGBA8 on demand.

use glam::Vec3A;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::hittable::{Hittable, Scene};
use crate::interval::Interval;
use crate::material::Color;
use crate::random::Sampler;
use crate::ray::Ray;

/// Lower bound on accepted ray parameters, avoiding self-intersection of a
/// scattered ray with the surface it just left ("shadow acne").
const T_MIN: f32 = 0.001;

/// Sky color straight up; the gradient blends toward white at the horizon.
const SKY_ZENITH: Color = Vec3A::new(0.5, 0.7, 1.0);

/// Per-frame sampling parameters plus the top-level RNG seed.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Output image width in pixels.
    pub width: u32,
    /// Output image height in pixels.
    pub height: u32,
    /// Random samples accumulated per pixel.
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces per sample.
    pub max_depth: u32,
    /// Seed for the deterministic per-row random streams.
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
        }
    }
}

/// Background shading for a ray that escaped the scene.
///
/// Blends white at the horizon into [`SKY_ZENITH`] straight up, keyed on the
/// y component of the normalized ray direction.
pub fn sky(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    (1.0 - t) * Color::ONE + t * SKY_ZENITH
}

/// Trace a ray and compute its color contribution.
///
/// Iteratively follows up to `max_depth` scatter events, accumulating the
/// per-channel attenuation product. A miss pays out the accumulated
/// throughput against the sky; an absorption returns black. Exhausting the
/// bounce budget also returns black: the last ray's sky contribution is
/// deliberately dropped. As the one exception, `max_depth == 0` skips
/// tracing entirely and returns the primary ray's background.
pub fn ray_color(ray: &Ray, scene: &Scene, max_depth: u32, sampler: &mut Sampler) -> Color {
    if max_depth == 0 {
        return sky(ray);
    }

    let mut throughput = Color::ONE;
    let mut current = *ray;

    for _ in 0..max_depth {
        match scene.hit(&current, Interval::new(T_MIN, f32::INFINITY)) {
            Some(rec) => match rec.material.scatter(&current, &rec, sampler) {
                Some(scatter) => {
                    throughput *= scatter.attenuation;
                    current = scatter.ray;
                }
                None => return Color::ZERO,
            },
            None => return throughput * sky(&current),
        }
    }

    Color::ZERO
}

/// Linear-color frame buffer, row-major with row 0 at the top of the image.
#[derive(Debug, Clone)]
pub struct Film {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    pixels: Vec<Color>,
}

impl Film {
    /// Create a film of the given dimensions, initialized to black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Linear pixel colors, row-major from the top of the image.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Linear color of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Convert to an RGBA8 byte buffer.
    ///
    /// Applies gamma-2 correction (`sqrt`), clamps to [0, 1], and truncates
    /// `channel * 255.99` to 8 bits. Alpha is always opaque.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.push((color.x.clamp(0.0, 1.0).sqrt() * 255.99) as u8);
            bytes.push((color.y.clamp(0.0, 1.0).sqrt() * 255.99) as u8);
            bytes.push((color.z.clamp(0.0, 1.0).sqrt() * 255.99) as u8);
            bytes.push(255);
        }
        bytes
    }
}

/// Render a frame of the scene through the camera.
///
/// Rows are rendered in parallel; each row owns a random stream derived from
/// the settings seed and its row index, and rows write disjoint slices of
/// the film, so the output is byte-identical for a fixed seed regardless of
/// thread count.
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> Film {
    let mut film = Film::new(settings.width, settings.height);
    if settings.width == 0 || settings.height == 0 {
        return film;
    }

    info!(
        "Rendering {}x{} at {} spp using {} CPU cores...",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        rayon::current_num_threads()
    );
    let generation_start = std::time::Instant::now();
    let pb = ProgressBar::new(settings.height as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} ETA: {eta}")
            .unwrap(),
    );

    let width = settings.width as f32;
    let height = settings.height as f32;

    film.pixels
        .par_chunks_mut(settings.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut sampler = Sampler::for_row(settings.seed, y as u64);

            for (x, pixel) in row.iter_mut().enumerate() {
                let mut color = Color::ZERO;

                for _ in 0..settings.samples_per_pixel {
                    // Sub-pixel jitter; v sweeps 1 (top) to 0 (bottom) so
                    // row 0 of the film is the top of the image.
                    let u = (x as f32 + sampler.next_f32()) / width;
                    let v = 1.0 - (y as f32 + sampler.next_f32()) / height;

                    let ray = camera.generate_ray(u, v, &mut sampler);
                    color += ray_color(&ray, scene, settings.max_depth, &mut sampler);
                }

                // A zero sample count leaves the pixel black instead of
                // dividing into a NaN.
                if settings.samples_per_pixel > 0 {
                    color /= settings.samples_per_pixel as f32;
                }
                *pixel = color;
            }
            pb.inc(1);
        });

    pb.finish();
    info!("Frame rendered in {:.2?}", generation_start.elapsed());

    film
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::sphere::Sphere;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(
            Sphere::new(
                Vec3A::new(0.0, -100.5, -1.0),
                100.0,
                Material::diffuse(Vec3A::new(0.8, 0.8, 0.0)),
            )
            .unwrap(),
        );
        scene.add(
            Sphere::new(
                Vec3A::new(0.0, 0.0, -1.0),
                0.5,
                Material::diffuse(Vec3A::new(0.1, 0.2, 0.5)),
            )
            .unwrap(),
        );
        scene.add(
            Sphere::new(
                Vec3A::new(1.0, 0.0, -1.0),
                0.5,
                Material::metal(Vec3A::new(0.8, 0.6, 0.2), 0.3),
            )
            .unwrap(),
        );
        scene.add(
            Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), 0.5, Material::dielectric(1.5)).unwrap(),
        );
        scene.add(
            Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), -0.45, Material::dielectric(1.5)).unwrap(),
        );
        scene
    }

    fn test_camera() -> Camera {
        Camera::new(
            Vec3A::ZERO,
            Vec3A::new(0.0, 0.0, -1.0),
            90.0,
            4.0 / 3.0,
            0.0,
            1.0,
        )
    }

    #[test]
    fn sky_is_exact_at_the_poles() {
        let scene = Scene::new();
        let mut sampler = Sampler::new(0);

        let up = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 1.0, 0.0));
        assert_eq!(ray_color(&up, &scene, 50, &mut sampler), SKY_ZENITH);

        let down = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, -1.0, 0.0));
        assert_eq!(ray_color(&down, &scene, 50, &mut sampler), Vec3A::ONE);
    }

    #[test]
    fn zero_depth_returns_background() {
        // Even with a sphere dead ahead, a zero bounce budget short-circuits
        // to the primary ray's background.
        let scene = test_scene();
        let mut sampler = Sampler::new(0);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

        assert_eq!(ray_color(&ray, &scene, 0, &mut sampler), sky(&ray));
    }

    #[test]
    fn exhausted_bounces_contribute_black() {
        // A negative-radius enclosure has inward normals, so a diffuse ray
        // can never escape; the budget runs out and the path goes black.
        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3A::ZERO, -10.0, Material::diffuse(Vec3A::ONE)).unwrap());

        let mut sampler = Sampler::new(123);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.3, 0.5, -1.0));
        assert_eq!(ray_color(&ray, &scene, 5, &mut sampler), Vec3A::ZERO);
    }

    #[test]
    fn throughput_never_exceeds_one() {
        let scene = test_scene();
        let camera = test_camera();
        let settings = RenderSettings {
            width: 16,
            height: 12,
            samples_per_pixel: 4,
            max_depth: 8,
            seed: 9,
        };

        let film = render(&scene, &camera, &settings);
        for color in film.pixels() {
            for channel in [color.x, color.y, color.z] {
                assert!(channel >= 0.0);
                assert!(channel <= 1.0 + 1.0e-4);
            }
        }
    }

    #[test]
    fn fixed_seed_reproduces_identical_bytes() {
        let scene = test_scene();
        let camera = test_camera();
        let settings = RenderSettings {
            width: 16,
            height: 12,
            samples_per_pixel: 4,
            max_depth: 8,
            seed: 7,
        };

        let first = render(&scene, &camera, &settings).to_rgba8();
        let second = render(&scene, &camera, &settings).to_rgba8();
        assert_eq!(first, second);
    }

    #[test]
    fn seed_changes_the_image() {
        let scene = test_scene();
        let camera = test_camera();
        let mut settings = RenderSettings {
            width: 16,
            height: 12,
            samples_per_pixel: 4,
            max_depth: 8,
            seed: 1,
        };

        let first = render(&scene, &camera, &settings).to_rgba8();
        settings.seed = 2;
        let second = render(&scene, &camera, &settings).to_rgba8();
        assert_ne!(first, second);
    }

    #[test]
    fn zero_samples_render_black() {
        let scene = test_scene();
        let camera = test_camera();
        let settings = RenderSettings {
            width: 8,
            height: 8,
            samples_per_pixel: 0,
            max_depth: 8,
            seed: 0,
        };

        let film = render(&scene, &camera, &settings);
        assert!(film.pixels().iter().all(|&p| p == Vec3A::ZERO));

        let bytes = film.to_rgba8();
        for chunk in bytes.chunks(4) {
            assert_eq!(chunk, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn rgba8_conversion_applies_gamma_and_scale() {
        let mut film = Film::new(2, 1);
        film.pixels[0] = Vec3A::splat(0.25);
        film.pixels[1] = Vec3A::new(1.0, 0.0, 2.0);

        let bytes = film.to_rgba8();
        // sqrt(0.25) * 255.99 = 127.995, truncated to 127.
        assert_eq!(&bytes[0..4], &[127, 127, 127, 255]);
        // Out-of-range channels clamp before conversion.
        assert_eq!(&bytes[4..8], &[255, 0, 255, 255]);
    }
}
