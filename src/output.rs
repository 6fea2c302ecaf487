//! # Output Module
//!
//! Writes rendered frames out in the supported formats:
//! - Real-time visualization via TEV (The EXR Viewer)
//! - PNG export (8-bit, gamma corrected by the film conversion)
//! - EXR export (full-precision linear HDR)
//!
//! ## TEV Integration
//!
//! TEV is a high-performance viewer for HDR images. This module handles the
//! network connection to a TEV client, the conversion from interleaved RGB
//! to the channel-wise layout TEV expects, and the image update packets.
//!
//! All failures here are logged and swallowed; an unwritable file or an
//! unreachable viewer never aborts a finished render.

use image::{ImageBuffer, Rgba};
use log::{debug, info, warn};
use std::net::TcpStream;
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use exr::prelude::*;

use lumapath::renderer::Film;

/// Send a rendered film to TEV for real-time visualization.
///
/// Establishes a TCP connection to a running TEV client and transmits the
/// linear pixel data. The workflow:
///
/// 1. Network connection with TCP_NODELAY for reduced latency
/// 2. TEV image creation with R/G/B channel configuration
/// 3. Conversion from interleaved RGB to channel-wise (planar) layout
/// 4. Data transmission with timing reported at debug level
///
/// # Arguments
///
/// * `film` - rendered frame with linear color values
/// * `tev_address` - TEV server address (IP:port or just IP, defaults to port 14158)
pub fn send_image_to_tev(film: &Film, tev_address: &str) {
    // Add default port if not specified
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{}:14158", tev_address)
    };

    debug!("Attempting to connect to TEV at {}", tev_address);

    match TcpStream::connect(&tev_address) {
        Ok(stream) => {
            // Configure TCP socket for optimal performance
            if let Err(e) = stream.set_nodelay(true) {
                debug!("Failed to set TCP_NODELAY: {}", e);
            }

            debug!("TCP connection established successfully");
            let mut client = TevClient::wrap(stream);

            let create_packet = PacketCreateImage {
                image_name: "lumapath_output",
                width: film.width,
                height: film.height,
                channel_names: &["R", "G", "B"],
                grab_focus: true,
            };

            match client.send(create_packet) {
                Ok(_) => debug!("Image created in TEV successfully"),
                Err(e) => {
                    warn!("Failed to create image in TEV: {}", e);
                    return;
                }
            }

            // Convert from interleaved (RGBRGB...) to planar
            // (RRR...GGG...BBB...) for TEV
            let pixel_count = (film.width * film.height) as usize;
            let mut rgb_data = Vec::with_capacity(pixel_count * 3);
            for pixel in film.pixels() {
                rgb_data.push(pixel.x);
            }
            for pixel in film.pixels() {
                rgb_data.push(pixel.y);
            }
            for pixel in film.pixels() {
                rgb_data.push(pixel.z);
            }

            debug!(
                "Sending {} pixels to TEV ({:.1} MB)",
                pixel_count,
                rgb_data.len() as f32 * 4.0 / 1_000_000.0
            );
            let start_time = std::time::Instant::now();

            let update_packet = PacketUpdateImage {
                image_name: "lumapath_output",
                grab_focus: false,
                channel_names: &["R", "G", "B"],
                x: 0,
                y: 0,
                width: film.width,
                height: film.height,
                channel_offsets: &[
                    0,
                    (film.width * film.height) as u64,
                    (2 * film.width * film.height) as u64,
                ],
                channel_strides: &[1, 1, 1],
                data: &rgb_data,
            };

            match client.send(update_packet) {
                Ok(_) => {
                    let elapsed = start_time.elapsed();
                    info!(
                        "Image data sent to TEV at {} successfully in {:.2?}",
                        tev_address, elapsed
                    );
                }
                Err(e) => warn!("Failed to send image data to TEV: {}", e),
            }
        }
        Err(e) => warn!("Failed to connect to TEV on {}: {}", tev_address, e),
    }
}

/// Save a rendered film as an 8-bit PNG.
///
/// The film supplies the RGBA8 conversion (gamma-2 correction, clamp, and
/// the 255.99 scale-and-truncate); this function only encodes the bytes.
///
/// # Errors
///
/// Logs warnings for I/O errors but does not panic. Common error causes are
/// an invalid path, insufficient permissions, or a full disk.
pub fn save_image_as_png(film: &Film, output_path: &str) {
    let data = film.to_rgba8();
    match ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(film.width, film.height, data) {
        Some(image) => match image.save(output_path) {
            Ok(_) => info!("Image saved as {}", output_path),
            Err(e) => warn!("Failed to save image: {}", e),
        },
        None => warn!(
            "Film dimensions {}x{} do not match its pixel buffer",
            film.width, film.height
        ),
    }
}

/// Save a rendered film as an EXR with full HDR precision.
///
/// Preserves the linear light values without tone mapping or gamma
/// correction, which suits viewing with TEV and downstream grading or
/// compositing.
///
/// # Errors
///
/// Logs warnings for I/O errors but does not panic.
pub fn save_image_as_exr(film: &Film, output_path: &str) {
    let result = write_rgb_file(
        output_path,
        film.width as usize,
        film.height as usize,
        |x, y| {
            let pixel = film.pixel(x as u32, y as u32);
            (pixel.x, pixel.y, pixel.z)
        },
    );

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}
