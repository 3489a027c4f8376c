//! Image XObject creation for signatures
//!
//! Signatures are decoded and re-embedded as 8-bit RGB with a separate
//! greyscale soft mask when the image carries transparency. JPEG input goes
//! through the same path so CMYK and progressive files come out uniform.

use crate::types::Signature;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Embed a signature image into `doc`, returning the XObject id
pub(super) fn embed_signature_image(
    doc: &mut Document,
    signature: &Signature,
) -> std::result::Result<ObjectId, String> {
    let rgba = image::load_from_memory(&signature.image)
        .map_err(|e| format!("cannot decode {}: {}", signature.id, e))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(format!("{} has no pixels", signature.id));
    }

    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|a| *a == u8::MAX);

    let mut dict = image_dictionary(width, height, b"DeviceRGB");
    if !opaque {
        let mut mask = Stream::new(image_dictionary(width, height, b"DeviceGray"), alpha);
        mask.compress()
            .map_err(|e| format!("cannot compress soft mask: {}", e))?;
        let mask_id = doc.add_object(mask);
        dict.set("SMask", Object::Reference(mask_id));
    }

    let mut stream = Stream::new(dict, rgb);
    stream
        .compress()
        .map_err(|e| format!("cannot compress image data: {}", e))?;

    Ok(doc.add_object(stream))
}

fn image_dictionary(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}
