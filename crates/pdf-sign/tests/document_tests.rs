use lopdf::{Dictionary, Document, Object, Stream};
use pdf_sign::geometry::bitmap_size_for_width;
use pdf_sign::*;

fn media_box(values: [i64; 4]) -> Object {
    Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
}

/// Build a document whose pages carry the given MediaBoxes. `None` leaves the
/// page without one so it inherits `inherited` from the page tree root.
fn create_test_pdf(boxes: &[Option<[i64; 4]>], inherited: Option<[i64; 4]>) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page_box in boxes {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if let Some(values) = page_box {
            page.set("MediaBox", media_box(*values));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(boxes.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    if let Some(values) = inherited {
        pages_dict.set("MediaBox", media_box(values));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_page_sizes_are_discovered() {
    let bytes = create_test_pdf(
        &[Some([0, 0, 612, 792]), Some([0, 0, 842, 595])],
        None,
    );
    let document = SourceDocument::from_bytes(bytes).unwrap();

    assert_eq!(document.page_count(), 2);
    let first = document.page_size(0).unwrap();
    assert_eq!((first.width, first.height), (612.0, 792.0));
    let second = document.page_size(1).unwrap();
    assert_eq!((second.width, second.height), (842.0, 595.0));
    assert!(document.page_size(2).is_none());
}

#[test]
fn test_inherited_media_box() {
    let bytes = create_test_pdf(&[None, Some([0, 0, 300, 300])], Some([0, 0, 420, 595]));
    let document = SourceDocument::from_bytes(bytes).unwrap();

    let inherited = document.page_size(0).unwrap();
    assert_eq!((inherited.width, inherited.height), (420.0, 595.0));
    let own = document.page_size(1).unwrap();
    assert_eq!((own.width, own.height), (300.0, 300.0));
}

#[test]
fn test_missing_media_box_defaults_to_letter() {
    let bytes = create_test_pdf(&[None], None);
    let document = SourceDocument::from_bytes(bytes).unwrap();
    assert_eq!(document.page_size(0), Some(NativePageSize::default()));
}

#[test]
fn test_offset_media_box_keeps_origin() {
    let bytes = create_test_pdf(&[Some([622, 812, 10, 20])], None);
    let document = SourceDocument::from_bytes(bytes).unwrap();
    let size = document.page_size(0).unwrap();
    assert_eq!((size.width, size.height), (612.0, 792.0));
    assert_eq!((size.origin_x, size.origin_y), (10.0, 20.0));
}

#[test]
fn test_document_without_pages_is_rejected() {
    let bytes = create_test_pdf(&[], None);
    assert!(matches!(
        SourceDocument::from_bytes(bytes),
        Err(SignError::Decode(_))
    ));
}

#[test]
fn test_bitmap_size_keeps_aspect_ratio() {
    let size = bitmap_size_for_width(&NativePageSize::default(), 800);
    assert_eq!(size.width, 800.0);
    assert_eq!(size.height, 1035.0);
}

#[test]
fn test_arrange_stacks_and_centres_pages() {
    let letter = NativePageSize::default();
    let options = LayoutOptions {
        render_width: 600,
        page_gap: 20.0,
        top_padding: 10.0,
    };
    let snapshot = PageLayout::new(1000.0, &options).arrange(&[
        (letter, Size::new(600.0, 776.0)),
        (letter, Size::new(600.0, 776.0)),
    ]);

    assert_eq!(snapshot.page_count(), 2);
    let first = snapshot.page_geometry(0).unwrap();
    assert_eq!(first.layout_rect, LayoutRect::new(0.0, 10.0, 1000.0, 776.0));
    assert_eq!(first.bitmap_rect, LayoutRect::new(200.0, 10.0, 600.0, 776.0));
    assert_eq!(first.bitmap_offset(), Point::new(200.0, 0.0));

    let second = snapshot.page_geometry(1).unwrap();
    assert_eq!(second.page_index, 1);
    assert_eq!(second.layout_rect.top, 806.0);
    assert_eq!(snapshot.content_height(), 1582.0);
    assert!(snapshot.page_geometry(2).is_none());
}

#[test]
fn test_narrow_container_grows_to_bitmap() {
    let letter = NativePageSize::default();
    let snapshot = PageLayout::new(300.0, &LayoutOptions::default())
        .arrange(&[(letter, Size::new(800.0, 1035.0))]);
    let page = snapshot.page_geometry(0).unwrap();
    assert_eq!(page.layout_rect.width, 800.0);
    assert_eq!(page.bitmap_offset(), Point::new(0.0, 0.0));
}

#[test]
fn test_page_lookup_by_vertical_position() {
    let letter = NativePageSize::default();
    let options = LayoutOptions {
        render_width: 600,
        page_gap: 20.0,
        top_padding: 10.0,
    };
    let snapshot = PageLayout::new(600.0, &options).arrange(&[
        (letter, Size::new(600.0, 776.0)),
        (letter, Size::new(600.0, 776.0)),
    ]);
    // Page 0 spans 10..786, page 1 spans 806..1582

    assert_eq!(snapshot.page_at_y(10.0), Some(0));
    assert_eq!(snapshot.page_at_y(786.0), None);
    assert_eq!(snapshot.page_at_y(806.0), Some(1));

    assert_eq!(snapshot.nearest_page(790.0), Some(0));
    assert_eq!(snapshot.nearest_page(800.0), Some(1));
    assert_eq!(snapshot.nearest_page(-50.0), Some(0));
    assert_eq!(snapshot.nearest_page(5000.0), Some(1));
    assert_eq!(LayoutSnapshot::default().nearest_page(0.0), None);
}
