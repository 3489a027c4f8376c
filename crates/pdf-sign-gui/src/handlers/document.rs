use pdf_async_runtime::{DocumentId, SignUpdate, SourceDocument};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::render::{DocumentStore, OpenDocument};

pub async fn handle_load(
    path: PathBuf,
    render_width: u32,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let document = match SourceDocument::load(&path).await {
        Ok(document) => document,
        Err(e) => {
            let _ = update_tx.send(SignUpdate::Error {
                message: format!("Failed to load PDF: {}", e),
            });
            return;
        }
    };

    let doc_id = store.next_id();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    store.add(
        doc_id,
        OpenDocument {
            path: path.clone(),
            bytes: Arc::new(document.bytes().to_vec()),
            page_count: document.page_count(),
        },
    );
    log::info!("Opened {} ({} pages)", file_name, document.page_count());

    let _ = update_tx.send(SignUpdate::DocumentLoaded {
        doc_id,
        path,
        file_name,
        document,
    });

    handle_render_pages(doc_id, render_width, store, update_tx).await;
}

#[cfg(feature = "pdf-viewer")]
pub async fn handle_render_pages(
    doc_id: DocumentId,
    render_width: u32,
    store: &DocumentStore,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let Some(document) = store.get(&doc_id) else {
        let _ = update_tx.send(SignUpdate::Error {
            message: format!("Document not found: {:?}", doc_id),
        });
        return;
    };

    let _ = update_tx.send(SignUpdate::RenderStarted {
        doc_id,
        page_count: document.page_count,
        render_width,
    });

    let bytes = Arc::clone(&document.bytes);
    let tx = update_tx.clone();
    let result = tokio::task::spawn_blocking(move || {
        crate::render::render_pages(&bytes, render_width, |page_index, total, page| {
            let _ = tx.send(SignUpdate::Progress {
                operation: "Rendering pages".to_string(),
                current: page_index + 1,
                total,
            });
            let _ = tx.send(SignUpdate::PageRendered {
                doc_id,
                page_index,
                width: page.width,
                height: page.height,
                rgba_data: page.rgba_data,
            });
        })
    })
    .await;

    let failure = match result {
        Ok(Ok(())) => {
            log::debug!("Rendered {:?} at {} px", doc_id, render_width);
            return;
        }
        Ok(Err(e)) => format!("Failed to render pages: {}", e),
        Err(e) => format!("Task join error: {}", e),
    };
    let _ = update_tx.send(SignUpdate::RenderFailed {
        doc_id,
        message: failure,
    });
}

#[cfg(not(feature = "pdf-viewer"))]
pub async fn handle_render_pages(
    doc_id: DocumentId,
    _render_width: u32,
    _store: &DocumentStore,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let _ = update_tx.send(SignUpdate::RenderFailed {
        doc_id,
        message: "Page rendering not available (pdf-viewer feature disabled)".to_string(),
    });
}

pub async fn handle_close(
    doc_id: DocumentId,
    store: &mut DocumentStore,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    if let Some(document) = store.remove(doc_id) {
        log::info!("Closed {}", document.path.display());
    }
    let _ = update_tx.send(SignUpdate::DocumentClosed { doc_id });
}
