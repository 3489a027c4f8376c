use pdf_async_runtime::{SignCommand, SignUpdate};
use tokio::sync::mpsc;

use crate::handlers;
use crate::render::DocumentStore;

/// Async worker task that processes signing commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<SignCommand>,
    update_tx: mpsc::UnboundedSender<SignUpdate>,
) {
    let mut store = DocumentStore::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut store, &mut command_rx, &update_tx).await;
    }
    log::debug!("Worker stopped");
}

async fn process_command(
    cmd: SignCommand,
    store: &mut DocumentStore,
    command_rx: &mut mpsc::UnboundedReceiver<SignCommand>,
    update_tx: &mpsc::UnboundedSender<SignUpdate>,
) {
    match cmd {
        SignCommand::LoadDocument { path, render_width } => {
            handlers::document::handle_load(path, render_width, store, update_tx).await;
        }
        SignCommand::RenderPages {
            mut doc_id,
            mut render_width,
        } => {
            // Coalesce queued re-renders, keeping only the most recent one
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let SignCommand::RenderPages {
                    doc_id: new_doc_id,
                    render_width: new_width,
                } = next_cmd
                {
                    log::debug!("Discarding queued render, using newer request");
                    doc_id = new_doc_id;
                    render_width = new_width;
                } else {
                    Box::pin(process_command(next_cmd, store, command_rx, update_tx)).await;
                }
            }

            handlers::document::handle_render_pages(doc_id, render_width, store, update_tx).await;
        }
        SignCommand::LoadSignatureImage { path } => {
            handlers::signing::handle_load_signature_image(path, update_tx).await;
        }
        SignCommand::LoadConfig { path } => {
            handlers::signing::handle_load_config(path, update_tx).await;
        }
        SignCommand::Commit {
            doc_id,
            request,
            output_dir,
            file_name,
        } => {
            handlers::signing::handle_commit(doc_id, request, output_dir, file_name, update_tx)
                .await;
        }
        SignCommand::CloseDocument { doc_id } => {
            handlers::document::handle_close(doc_id, store, update_tx).await;
        }
    }
}
