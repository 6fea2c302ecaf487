//! Thin-lens camera for ray generation.
//!
//! Maps normalized image-plane coordinates plus a lens sample to world-space
//! rays. Orientation is held as yaw (heading) and pitch about the world axes
//! and can be driven by look-at, keyboard, and mouse commands between frames;
//! the derived screen vectors are recomputed on every state change and stay
//! fixed while a frame's rays are generated.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3, Vec3A};

use crate::random::Sampler;
use crate::ray::Ray;

/// Movement speed for keyboard commands, world units per second.
const SPEED: f32 = 5.0;
/// Mouse-look sensitivity, radians per pixel of cursor travel.
const SENSITIVITY: f32 = 0.005;

/// Directions a keyboard movement command can take the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Along the view direction.
    Forward,
    /// Against the view direction.
    Backward,
    /// Along negative camera right.
    Left,
    /// Along camera right.
    Right,
    /// Along world up.
    Up,
}

/// Thin-lens perspective camera.
///
/// `generate_ray` maps `(u, v)` in `[0, 1]²` (0,0 = bottom-left) to a ray
/// whose direction is deliberately left un-normalized. A positive aperture
/// samples ray origins over a lens disk for depth-of-field blur.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    position: Vec3A,
    /// Rotation about the world x axis, clamped to ±π/2.
    pitch: f32,
    /// Rotation about the world y axis, wrapped to [0, 2π).
    heading: f32,

    half_width: f32,
    half_height: f32,
    lens_radius: f32,
    focus_dist: f32,

    // Derived state, rebuilt by update_orientation().
    forward: Vec3A,
    right: Vec3A,
    up: Vec3A,
    lower_left_corner: Vec3A,
    screen_horizontal: Vec3A,
    screen_vertical: Vec3A,
}

impl Camera {
    /// Create a camera at `eye` looking toward `target`.
    ///
    /// `vfov` is the vertical field of view in degrees, `aspect` the image
    /// width over height, `aperture` the lens diameter (0 for a pinhole),
    /// and `focus_dist` the distance to the plane of perfect focus.
    pub fn new(
        eye: Vec3A,
        target: Vec3A,
        vfov: f32,
        aspect: f32,
        aperture: f32,
        focus_dist: f32,
    ) -> Self {
        let theta = vfov.to_radians();
        let half_height = (theta / 2.0).tan();

        let to_eye = (eye - target).normalize();
        let mut camera = Self {
            position: eye,
            pitch: to_eye.y.asin(),
            heading: -to_eye.x.atan2(to_eye.z),
            half_width: aspect * half_height,
            half_height,
            lens_radius: aperture.max(0.0) / 2.0,
            focus_dist,
            forward: Vec3A::ZERO,
            right: Vec3A::ZERO,
            up: Vec3A::ZERO,
            lower_left_corner: Vec3A::ZERO,
            screen_horizontal: Vec3A::ZERO,
            screen_vertical: Vec3A::ZERO,
        };
        camera.update_orientation();
        camera
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3A {
        self.position
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3A {
        self.forward
    }

    /// Generate the ray for normalized image coordinates `(u, v)`.
    ///
    /// Callers jitter `u` and `v` by a sub-pixel offset per sample for
    /// antialiasing. The lens disk is sampled unconditionally so the random
    /// consumption order is the same with or without depth of field; a zero
    /// lens radius collapses the offset to zero.
    pub fn generate_ray(&self, u: f32, v: f32, sampler: &mut Sampler) -> Ray {
        let disk = self.lens_radius * sampler.in_unit_disk();
        let offset = disk.x * self.screen_horizontal + disk.y * self.screen_vertical;

        let direction = self.lower_left_corner + u * self.screen_horizontal
            + v * self.screen_vertical
            - self.position
            - offset;
        Ray::new(self.position + offset, direction)
    }

    /// Re-aim the camera at a world-space target.
    pub fn look_at(&mut self, target: Vec3A) {
        let front = (target - self.position).normalize();
        self.pitch = -front.y.asin();
        self.heading = -(front.x.atan2(front.z) - PI);
        self.update_orientation();
    }

    /// Apply a keyboard movement command for `delta_time` seconds.
    pub fn process_keyboard(&mut self, movement: CameraMovement, delta_time: f32) {
        let velocity = SPEED * delta_time;
        match movement {
            CameraMovement::Forward => self.position += self.forward * velocity,
            CameraMovement::Backward => self.position -= self.forward * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += Vec3A::Y * velocity,
        }
        self.update_orientation();
    }

    /// Apply a mouse-look delta in pixels.
    ///
    /// Heading wraps around the full circle; pitch is clamped to straight up
    /// and straight down.
    pub fn process_mouse(&mut self, x_offset: f32, y_offset: f32) {
        if x_offset == 0.0 && y_offset == 0.0 {
            return;
        }

        self.heading += x_offset * SENSITIVITY;
        if self.heading >= TAU {
            self.heading -= TAU;
        }
        if self.heading < 0.0 {
            self.heading += TAU;
        }

        self.pitch = (self.pitch + y_offset * SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);

        self.update_orientation();
    }

    /// Rebuild the orthonormal basis and screen vectors from the current
    /// position, pitch, and heading.
    fn update_orientation(&mut self) {
        let pitch_quat = Quat::from_axis_angle(Vec3::X, self.pitch);
        let heading_quat = Quat::from_axis_angle(Vec3::Y, self.heading);
        let inverse = (pitch_quat * heading_quat).conjugate();

        self.forward = inverse * Vec3A::new(0.0, 0.0, -1.0);
        self.right = inverse * Vec3A::X;
        self.up = inverse * Vec3A::Y;

        self.lower_left_corner = self.position
            - self.focus_dist * self.half_width * self.right
            - self.focus_dist * self.half_height * self.up
            + self.focus_dist * self.forward;
        self.screen_horizontal = 2.0 * self.half_width * self.focus_dist * self.right;
        self.screen_vertical = 2.0 * self.half_height * self.focus_dist * self.up;
    }
}
