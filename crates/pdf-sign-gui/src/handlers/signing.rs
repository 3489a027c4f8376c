use pdf_async_runtime::{CommitRequest, DocumentId, SessionConfig, SignUpdate};
use pdf_sign::{capture, sign_to_file};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_load_signature_image(
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    match capture::load_upload(&path).await {
        Ok(captured) => {
            let _ = update_tx.send(SignUpdate::SignatureImageLoaded { captured });
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::Error {
                message: format!("Failed to load {}: {}", path.display(), e),
            });
        }
    }
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<SignUpdate>) {
    match SessionConfig::load(&path).await {
        Ok(config) => {
            log::info!("Loaded settings from {}", path.display());
            let _ = update_tx.send(SignUpdate::ConfigLoaded { config });
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::Error {
                message: format!("Failed to load settings: {}", e),
            });
        }
    }
}

pub async fn handle_commit(
    doc_id: DocumentId,
    request: CommitRequest,
    output_dir: PathBuf,
    file_name: String,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    let _ = update_tx.send(SignUpdate::Progress {
        operation: format!("Signing {}", file_name),
        current: 0,
        total: 1,
    });

    match sign_to_file(request, &output_dir, &file_name).await {
        Ok(path) => {
            let _ = update_tx.send(SignUpdate::Committed { doc_id, path });
        }
        Err(e) => {
            let _ = update_tx.send(SignUpdate::Error {
                message: format!("Failed to sign {}: {}", file_name, e),
            });
        }
    }
}
