use std::path::PathBuf;

// Re-export types from the signing library
pub use pdf_sign::{CapturedImage, CommitRequest, SessionConfig, SourceDocument};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum SignCommand {
    /// Decode a document and render every page at `render_width` pixels
    LoadDocument {
        path: PathBuf,
        render_width: u32,
    },
    /// Re-render an open document, e.g. after the surface was resized
    RenderPages {
        doc_id: DocumentId,
        render_width: u32,
    },
    LoadSignatureImage {
        path: PathBuf,
    },
    LoadConfig {
        path: PathBuf,
    },
    /// Embed the placements and write `signed-<file_name>` into `output_dir`
    Commit {
        doc_id: DocumentId,
        request: CommitRequest,
        output_dir: PathBuf,
        file_name: String,
    },
    CloseDocument {
        doc_id: DocumentId,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum SignUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    DocumentLoaded {
        doc_id: DocumentId,
        path: PathBuf,
        file_name: String,
        document: SourceDocument,
    },
    /// A render pass started; `page_count` pages will follow
    RenderStarted {
        doc_id: DocumentId,
        page_count: usize,
        render_width: u32,
    },
    PageRendered {
        doc_id: DocumentId,
        page_index: usize,
        width: usize,
        height: usize,
        rgba_data: Vec<u8>,
    },
    RenderFailed {
        doc_id: DocumentId,
        message: String,
    },
    SignatureImageLoaded {
        captured: CapturedImage,
    },
    ConfigLoaded {
        config: SessionConfig,
    },
    Committed {
        doc_id: DocumentId,
        path: PathBuf,
    },
    DocumentClosed {
        doc_id: DocumentId,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
