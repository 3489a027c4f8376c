//! Document compositing - baking overlays into the PDF
//!
//! This module turns the in-memory placements into a new document:
//! 1. Resolve every overlay's page geometry at commit time
//! 2. Transform layout geometry into native page space
//! 3. Embed each signature once as an image XObject
//! 4. Append drawing operators to each affected page
//!
//! Any failure aborts the whole commit; a partially signed document is
//! never produced.

mod page;
mod xobject;

use crate::document::page_size;
use crate::geometry::{LayoutSnapshot, PageGeometryProvider};
use crate::transform::{NativePlacement, to_native};
use crate::types::*;
use lopdf::{Document, ObjectId};
use page::{append_content, placement_ops, register_xobjects};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use xobject::embed_signature_image;

/// Everything needed to commit, owned so it can move to a blocking task
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub original: Vec<u8>,
    pub overlays: Vec<Overlay>,
    pub signatures: HashMap<SignatureId, Signature>,
    pub geometry: LayoutSnapshot,
}

/// Produce a copy of `original` with every overlay embedded.
///
/// With no overlays the original bytes are returned unchanged.
pub fn compose(
    original: &[u8],
    overlays: &[Overlay],
    signatures: &HashMap<SignatureId, Signature>,
    geometry: &dyn PageGeometryProvider,
) -> Result<Vec<u8>> {
    if overlays.is_empty() {
        log::info!("Nothing placed, document left unchanged");
        return Ok(original.to_vec());
    }

    // Resolve every placement before touching the document
    let mut placements = Vec::with_capacity(overlays.len());
    for overlay in overlays {
        let page = geometry
            .page_geometry(overlay.page_index)
            .ok_or(SignError::GeometryUnavailable {
                overlay: overlay.id,
                page: overlay.page_index,
            })?;
        let signature = signatures
            .get(&overlay.signature)
            .ok_or_else(|| SignError::Embed {
                overlay: overlay.id,
                reason: format!("{} is not part of this session", overlay.signature),
            })?;
        placements.push((overlay, signature, to_native(&overlay.rect(), &page)));
    }

    let mut doc = Document::load_mem(original).map_err(|e| SignError::Decode(e.to_string()))?;
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    // Embed images once per signature, grouping draws by page
    let mut image_cache: HashMap<SignatureId, ObjectId> = HashMap::new();
    let mut by_page: BTreeMap<usize, Vec<(ObjectId, NativePlacement)>> = BTreeMap::new();

    for (overlay, signature, native) in placements {
        if overlay.page_index >= page_ids.len() {
            return Err(SignError::GeometryUnavailable {
                overlay: overlay.id,
                page: overlay.page_index,
            });
        }

        let image_id = match image_cache.get(&signature.id) {
            Some(id) => *id,
            None => {
                let id = embed_signature_image(&mut doc, signature).map_err(|reason| {
                    SignError::Embed {
                        overlay: overlay.id,
                        reason,
                    }
                })?;
                image_cache.insert(signature.id, id);
                id
            }
        };

        log::debug!(
            "{} -> page {} at ({:.2}, {:.2}) {:.2}x{:.2} pt, {}°",
            overlay.id,
            overlay.page_index + 1,
            native.x,
            native.y,
            native.width,
            native.height,
            native.rotation_degrees
        );
        by_page
            .entry(overlay.page_index)
            .or_default()
            .push((image_id, native));
    }

    for (page_index, draws) in &by_page {
        let page_id = page_ids[*page_index];
        let page_box = page_size(&doc, page_id)?;

        let images: Vec<ObjectId> = draws.iter().map(|(id, _)| *id).collect();
        let names = register_xobjects(&mut doc, page_id, &images)?;

        let ops: String = names
            .iter()
            .zip(draws)
            .map(|(name, (_, native))| placement_ops(name, native, &page_box))
            .collect();
        append_content(&mut doc, page_id, &ops)?;
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)?;

    log::info!(
        "Embedded {} placements on {} pages",
        overlays.len(),
        by_page.len()
    );
    Ok(output)
}

/// Commit for handoff to a caller (e.g. an upload)
pub async fn sign_to_bytes(request: CommitRequest) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        compose(
            &request.original,
            &request.overlays,
            &request.signatures,
            &request.geometry,
        )
    })
    .await?
}

/// Commit and write `signed-<original-name>` into `out_dir`
pub async fn sign_to_file(
    request: CommitRequest,
    out_dir: impl AsRef<Path>,
    original_name: &str,
) -> Result<PathBuf> {
    let bytes = sign_to_bytes(request).await?;
    let path = out_dir.as_ref().join(signed_file_name(original_name));
    tokio::fs::write(&path, bytes).await?;
    log::info!("Signed document written to {}", path.display());
    Ok(path)
}

/// Name of the signed copy of `original_name`
pub fn signed_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("document.pdf");
    format!("signed-{}", base)
}
