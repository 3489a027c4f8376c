//! Page-level edits: resources and content streams

use crate::document::{NativePageSize, inherited_attribute, resolve};
use crate::transform::NativePlacement;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Register image XObjects in a page's resources under fresh names.
///
/// Inherited or indirect resource dictionaries are copied onto the page so
/// other pages sharing them are unaffected.
pub(super) fn register_xobjects(
    doc: &mut Document,
    page_id: ObjectId,
    images: &[ObjectId],
) -> Result<Vec<String>> {
    let mut resources = match inherited_attribute(doc, page_id, b"Resources")? {
        Some(obj) => resolve(doc, obj)?.as_dict().cloned().unwrap_or_default(),
        None => Dictionary::new(),
    };
    let mut xobjects = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj)?.as_dict().cloned().unwrap_or_default(),
        Err(_) => Dictionary::new(),
    };

    let mut names = Vec::with_capacity(images.len());
    let mut counter = 0;
    for image_id in images {
        let name = loop {
            let candidate = format!("SigIm{}", counter);
            counter += 1;
            if !xobjects.has(candidate.as_bytes()) {
                break candidate;
            }
        };
        xobjects.set(name.as_bytes(), Object::Reference(*image_id));
        names.push(name);
    }

    resources.set("XObject", Object::Dictionary(xobjects));
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));

    Ok(names)
}

/// Append drawing operators to a page.
///
/// The existing content is bracketed by `q`/`Q` so any graphics state it
/// leaves behind cannot affect the appended operators.
pub(super) fn append_content(doc: &mut Document, page_id: ObjectId, ops: &str) -> Result<()> {
    let existing = {
        let page = doc.get_dictionary(page_id)?;
        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id)? {
                Object::Array(parts) => parts.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(parts)) => parts.clone(),
            _ => Vec::new(),
        }
    };

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let close_id = doc.add_object(Stream::new(
        Dictionary::new(),
        format!("Q\n{}", ops).into_bytes(),
    ));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(close_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Content stream operators drawing image `name` at `placement`, rotated
/// about its centre. `page` supplies the page box origin.
pub(super) fn placement_ops(
    name: &str,
    placement: &NativePlacement,
    page: &NativePageSize,
) -> String {
    let x = placement.x + page.origin_x;
    let y = placement.y + page.origin_y;
    let (w, h) = (placement.width, placement.height);

    if placement.rotation_degrees.rem_euclid(360.0) == 0.0 {
        return format!("q {} 0 0 {} {} {} cm /{} Do Q\n", w, h, x, y, name);
    }

    let theta = placement.rotation_degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    format!(
        "q 1 0 0 1 {} {} cm {} {} {} {} 0 0 cm {} 0 0 {} {} {} cm /{} Do Q\n",
        cx,
        cy,
        cos,
        sin,
        -sin,
        cos,
        w,
        h,
        -w / 2.0,
        -h / 2.0,
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_placement_is_single_matrix() {
        let placement = NativePlacement {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            rotation_degrees: 0.0,
        };
        let ops = placement_ops("SigIm0", &placement, &NativePageSize::default());
        assert_eq!(ops, "q 100 0 0 50 10 20 cm /SigIm0 Do Q\n");
    }

    #[test]
    fn test_page_origin_is_applied() {
        let placement = NativePlacement {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            rotation_degrees: 0.0,
        };
        let page = NativePageSize {
            origin_x: 5.0,
            origin_y: -8.0,
            ..NativePageSize::default()
        };
        let ops = placement_ops("SigIm0", &placement, &page);
        assert_eq!(ops, "q 100 0 0 50 15 12 cm /SigIm0 Do Q\n");
    }

    #[test]
    fn test_rotated_placement_pivots_on_centre() {
        let placement = NativePlacement {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            rotation_degrees: -90.0,
        };
        let ops = placement_ops("SigIm0", &placement, &NativePageSize::default());
        assert!(ops.starts_with("q 1 0 0 1 50 25 cm "));
        assert!(ops.ends_with("100 0 0 50 -50 -25 cm /SigIm0 Do Q\n"));
    }
}
