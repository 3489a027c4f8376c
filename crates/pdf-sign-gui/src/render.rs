use pdf_async_runtime::DocumentId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Bind Pdfium, trying a vendored library first, then the system one
#[cfg(feature = "pdf-viewer")]
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// One page rasterised to RGBA
#[cfg(feature = "pdf-viewer")]
pub struct RenderedPage {
    pub rgba_data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Rasterise every page of `bytes` at `render_width` pixels, calling
/// `on_page` as each one completes
#[cfg(feature = "pdf-viewer")]
pub fn render_pages(
    bytes: &[u8],
    render_width: u32,
    mut on_page: impl FnMut(usize, usize, RenderedPage),
) -> Result<(), PdfiumError> {
    let pdfium = init_pdfium()?;
    let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
    let page_count = document.pages().len() as usize;

    let config = PdfRenderConfig::new().set_target_width(render_width as i32);

    for (page_index, page) in document.pages().iter().enumerate() {
        let bitmap = page.render_with_config(&config)?;
        on_page(
            page_index,
            page_count,
            RenderedPage {
                rgba_data: bitmap.as_rgba_bytes().to_vec(),
                width: bitmap.width() as usize,
                height: bitmap.height() as usize,
            },
        );
    }
    Ok(())
}

/// A document opened by the worker
pub struct OpenDocument {
    pub path: PathBuf,
    pub bytes: Arc<Vec<u8>>,
    pub page_count: usize,
}

/// Documents the worker currently holds
pub struct DocumentStore {
    documents: HashMap<DocumentId, OpenDocument>,
    next_doc_id: AtomicU64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            next_doc_id: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> DocumentId {
        DocumentId(self.next_doc_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn add(&mut self, doc_id: DocumentId, document: OpenDocument) {
        log::debug!(
            "Worker holds {:?} ({}, {} pages)",
            doc_id,
            document.path.display(),
            document.page_count
        );
        self.documents.insert(doc_id, document);
    }

    pub fn get(&self, doc_id: &DocumentId) -> Option<&OpenDocument> {
        self.documents.get(doc_id)
    }

    pub fn remove(&mut self, doc_id: DocumentId) -> Option<OpenDocument> {
        self.documents.remove(&doc_id)
    }
}
