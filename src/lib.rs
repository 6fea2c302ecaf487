//! LumaPath path tracer
//!
//! CPU Monte-Carlo path tracer for sphere scenes: seeded deterministic
//! sampling, a thin-lens camera, diffuse/metal/dielectric materials, and a
//! row-parallel frame driver producing RGBA8 output.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod hittable;
pub mod interval;
pub mod material;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod sphere;
