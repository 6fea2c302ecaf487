use clap::Parser;
use glam::Vec3A;
use log::info;

mod cli;
mod logger;
mod output;

use lumapath::camera::Camera;
use lumapath::hittable::Scene;
use lumapath::material::Material;
use lumapath::random::Sampler;
use lumapath::renderer::{self, RenderSettings};
use lumapath::sphere::{Sphere, SphereError};

use cli::Args;
use logger::init_logger;
use output::{save_image_as_exr, save_image_as_png, send_image_to_tev};

/// Create the cover scene: a diffuse ground, a field of small random
/// spheres, and three large feature spheres. Placement draws from the
/// seeded sampler so the same seed rebuilds the same scene.
fn create_scene(sampler: &mut Sampler) -> Result<Scene, SphereError> {
    let mut scene = Scene::new();

    // Ground sphere
    let ground_material = Material::diffuse(Vec3A::new(0.5, 0.5, 0.5));
    scene.add(Sphere::new(
        Vec3A::new(0.0, -1000.0, 0.0),
        1000.0,
        ground_material,
    )?);

    // Grid of small spheres with randomized materials
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = sampler.next_f32();
            let center = Vec3A::new(
                a as f32 + 0.9 * sampler.next_f32(),
                0.2,
                b as f32 + 0.9 * sampler.next_f32(),
            );

            // Don't place spheres too close to the large feature spheres
            if (center - Vec3A::new(4.0, 0.2, 0.0)).length() > 0.9 {
                let sphere_material = if choose_mat < 0.8 {
                    let albedo = sampler.color() * sampler.color();
                    Material::diffuse(albedo)
                } else if choose_mat < 0.95 {
                    let albedo = sampler.color_range(0.5, 1.0);
                    let fuzz = sampler.next_f32_range(0.0, 0.5);
                    Material::metal(albedo, fuzz)
                } else {
                    Material::dielectric(1.5)
                };

                scene.add(Sphere::new(center, 0.2, sphere_material)?);
            }
        }
    }

    // Three large feature spheres. The glass one is a hollow shell: the
    // inner sphere's negative radius points its normal inward.
    scene.add(Sphere::new(
        Vec3A::new(0.0, 1.0, 0.0),
        1.0,
        Material::dielectric(1.5),
    )?);
    scene.add(Sphere::new(
        Vec3A::new(0.0, 1.0, 0.0),
        -0.95,
        Material::dielectric(1.5),
    )?);

    scene.add(Sphere::new(
        Vec3A::new(-4.0, 1.0, 0.0),
        1.0,
        Material::diffuse(Vec3A::new(0.4, 0.2, 0.1)),
    )?);

    scene.add(Sphere::new(
        Vec3A::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Vec3A::new(0.7, 0.6, 0.5), 0.0),
    )?);

    Ok(scene)
}

/// Create the camera for the cover shot
fn create_camera(width: u32, height: u32) -> Camera {
    let eye = Vec3A::new(13.0, 2.0, 3.0);
    let target = Vec3A::ZERO;
    let aspect = width as f32 / height as f32;
    Camera::new(eye, target, 20.0, aspect, 0.1, 10.0)
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    // Log application startup with version information
    info!(
        "LumaPath - Git Version {} ({})",
        env!("GIT_HASH"),
        env!("GIT_DATE")
    );

    info!(
        "Image resolution: {}x{}, samples per pixel: {}, seed: {}",
        args.width, args.height, args.samples_per_pixel, args.seed
    );

    // Scene placement uses its own stream so render rows stay independent
    let mut scene_sampler = Sampler::new(args.seed);
    let scene = match create_scene(&mut scene_sampler) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };
    info!("Scene contains {} spheres", scene.len());

    let camera = create_camera(args.width, args.height);

    let settings = RenderSettings {
        width: args.width,
        height: args.height,
        samples_per_pixel: args.samples_per_pixel,
        max_depth: args.max_depth,
        seed: args.seed,
    };
    let film = renderer::render(&scene, &camera, &settings);

    // Send image to TEV if requested
    let should_send_to_tev = args.tev || args.tev_address.is_some();
    if should_send_to_tev {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
        send_image_to_tev(&film, tev_address);
    }

    // Save image based on file extension
    if args.output.ends_with(".exr") {
        save_image_as_exr(&film, &args.output);
    } else if args.output.ends_with(".png") {
        save_image_as_png(&film, &args.output);
    } else {
        log::error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output)
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
        );
        std::process::exit(1);
    }
}
