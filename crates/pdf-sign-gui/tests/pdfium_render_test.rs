#[cfg(all(test, feature = "pdf-viewer"))]
mod pdfium_render_tests {
    use lopdf::{Dictionary, Document, Object, Stream};
    use pdf_sign::geometry::bitmap_size_for_width;
    use pdf_sign::*;
    use pdfium_render::prelude::*;
    use std::io::Cursor;
    use std::time::Instant;

    const RENDER_WIDTH: u32 = 612;

    fn blank_letter_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn black_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(40, 20, image::Rgba([0, 0, 0, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn bind_pdfium() -> Option<Pdfium> {
        let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let vendor = manifest_dir
            .parent()
            .and_then(|p| p.parent())
            .map(|root| root.join("vendor/pdfium/lib"));

        if let Some(vendor) = vendor {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor))
            {
                return Some(Pdfium::new(binding));
            }
        }
        Pdfium::bind_to_system_library().ok().map(Pdfium::new)
    }

    #[test]
    fn test_signed_page_renders_signature() {
        let Some(pdfium) = bind_pdfium() else {
            eprintln!("Pdfium library not available, skipping render check");
            return;
        };

        let document = SourceDocument::from_bytes(blank_letter_pdf()).unwrap();
        let pages: Vec<_> = document
            .page_sizes()
            .iter()
            .map(|native| (*native, bitmap_size_for_width(native, RENDER_WIDTH)))
            .collect();
        let snapshot =
            PageLayout::new(RENDER_WIDTH as f32, &LayoutOptions::default()).arrange(&pages);

        let mut session = SigningSession::default();
        let captured = capture_upload(black_png()).unwrap();
        let id = session
            .add_signature(captured, &snapshot, Instant::now())
            .unwrap();
        let signed = session.commit(&document, &snapshot).unwrap();

        let overlay = session.overlays().get(id).unwrap();
        let page = snapshot.page_geometry(0).unwrap();
        let native = to_native(&overlay.rect(), &page);
        let (cx, cy) = native.center();

        let pdf = pdfium.load_pdf_from_byte_slice(&signed, None).unwrap();
        assert_eq!(pdf.pages().len(), 1);
        let rendered_page = pdf.pages().get(0).unwrap();
        let rendered = rendered_page
            .render_with_config(&PdfRenderConfig::new().set_target_width(RENDER_WIDTH as i32))
            .unwrap();

        let width = rendered.width() as usize;
        let height = rendered.height() as usize;
        let scale = width as f32 / 612.0;
        let px = (cx * scale) as usize;
        let py = ((792.0 - cy) * scale) as usize;
        assert!(px < width && py < height);

        let rgba = rendered.as_rgba_bytes();
        let offset = (py * width + px) * 4;
        assert!(
            rgba[offset] < 64 && rgba[offset + 1] < 64 && rgba[offset + 2] < 64,
            "signature centre should be dark, got {:?}",
            &rgba[offset..offset + 4]
        );

        // A corner of the page stays white
        assert!(rgba[0] > 200 && rgba[1] > 200 && rgba[2] > 200);
    }
}
