//! Source document decoding
//!
//! Page count and page sizes are discovered here rather than supplied by
//! the caller. The decoded `lopdf::Document` is not retained: the original
//! bytes are kept untouched so the compositor can always start from them.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// Maximum depth followed when resolving inherited page attributes
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Size of a page in PDF points, with the lower-left corner of its box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativePageSize {
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for NativePageSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_PAGE_DIMENSIONS.0,
            height: DEFAULT_PAGE_DIMENSIONS.1,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

/// A decoded source document: its original bytes and page sizes
#[derive(Debug, Clone)]
pub struct SourceDocument {
    bytes: Vec<u8>,
    pages: Vec<NativePageSize>,
}

impl SourceDocument {
    /// Decode a document from memory.
    ///
    /// Any parse failure, and a document without pages, is a
    /// [`SignError::Decode`].
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let doc = Document::load_mem(&bytes).map_err(|e| SignError::Decode(e.to_string()))?;
        let pages = read_page_sizes(&doc)?;

        if pages.is_empty() {
            return Err(SignError::Decode("document has no pages".to_string()));
        }

        log::info!("Decoded document with {} pages", pages.len());
        Ok(Self { bytes, pages })
    }

    /// Read and decode a document from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        tokio::task::spawn_blocking(move || Self::from_bytes(bytes)).await?
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_size(&self, page_index: usize) -> Option<NativePageSize> {
        self.pages.get(page_index).copied()
    }

    pub fn page_sizes(&self) -> &[NativePageSize] {
        &self.pages
    }
}

/// Page sizes of every page in document order
pub(crate) fn read_page_sizes(doc: &Document) -> Result<Vec<NativePageSize>> {
    doc.get_pages()
        .values()
        .map(|&page_id| page_size(doc, page_id))
        .collect()
}

/// Size of one page from its (possibly inherited) MediaBox
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> Result<NativePageSize> {
    let Some(media_box) = inherited_attribute(doc, page_id, b"MediaBox")? else {
        return Ok(NativePageSize::default());
    };

    let media_box = resolve(doc, media_box)?;
    let Ok(values) = media_box.as_array() else {
        return Ok(NativePageSize::default());
    };

    let numbers: Vec<f32> = values
        .iter()
        .filter_map(|obj| resolve(doc, obj).ok().and_then(extract_number))
        .collect();

    if numbers.len() != 4 {
        return Ok(NativePageSize::default());
    }

    // Boxes may list their corners in any order
    let (x0, x1) = (numbers[0].min(numbers[2]), numbers[0].max(numbers[2]));
    let (y0, y1) = (numbers[1].min(numbers[3]), numbers[1].max(numbers[3]));

    if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
        return Ok(NativePageSize::default());
    }

    Ok(NativePageSize {
        width: x1 - x0,
        height: y1 - y0,
        origin_x: x0,
        origin_y: y0,
    })
}

/// Look up a page attribute, walking up the page tree for inherited values
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let dict = doc.get_dictionary(current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Follow a single indirect reference
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
