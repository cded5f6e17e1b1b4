use std::io::Cursor;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;

/// Decode a `data:<mime>;base64,<payload>` string into an upright raster.
pub fn decode_data_uri(encoded_image: &str) -> Result<DynamicImage> {
    let bytes = decode_payload(encoded_image)?;
    let mut dynamic_image = decode_image(&bytes)?;
    if let Some(orientation) = read_orientation(&bytes) {
        fix_image_orientation(orientation, &mut dynamic_image);
    }
    Ok(dynamic_image)
}

/// Base64-decode everything after the first comma.
pub fn decode_payload(encoded_image: &str) -> Result<Vec<u8>> {
    let (_, payload) = encoded_image
        .split_once(',')
        .ok_or_else(|| anyhow!("payload has no ',' separator"))?;

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        bail!("payload is empty");
    }

    STANDARD
        .decode(payload.as_bytes())
        .context("payload is not valid base64")
}

fn decode_image(file_in_memory: &[u8]) -> Result<DynamicImage> {
    let decoders: Vec<fn(&[u8]) -> Result<DynamicImage>> = vec![image_crate_decoder];

    for decoder in decoders {
        match decoder(file_in_memory) {
            Ok(decoded_image) => return Ok(decoded_image),
            Err(_) => continue,
        }
    }

    bail!("all decoders failed for {} byte payload", file_in_memory.len());
}

fn image_crate_decoder(file_in_memory: &[u8]) -> Result<DynamicImage> {
    let dynamic_image = image::load_from_memory(file_in_memory)
        .context("image crate failed to decode image from memory")?;
    Ok(dynamic_image)
}

/// EXIF orientation tag of the primary image, if any.
fn read_orientation(file_in_memory: &[u8]) -> Option<u32> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(file_in_memory))
        .ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}

/// Undo EXIF orientations 2 to 8. 5 and 7 are the mirrored quarter turns.
pub fn fix_image_orientation(orientation: u32, dynamic_image: &mut DynamicImage) {
    match orientation {
        2 => *dynamic_image = dynamic_image.fliph(),
        3 => *dynamic_image = dynamic_image.rotate180(),
        4 => *dynamic_image = dynamic_image.flipv(),
        5 => *dynamic_image = dynamic_image.rotate90().fliph(),
        6 => *dynamic_image = dynamic_image.rotate90(),
        7 => *dynamic_image = dynamic_image.rotate270().fliph(),
        8 => *dynamic_image = dynamic_image.rotate270(),
        _ => (),
    }
}
