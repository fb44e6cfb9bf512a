//! Draw opaque cover rectangles onto a document
//!
//! Staging only paints over regions; it does not remove anything from the
//! underlying content streams. The covered document is meant to be
//! rasterized and rebuilt by [`crate::assemble`] before it leaves the server.

use std::collections::BTreeMap;

use crate::error::PdfToolsError;
use crate::redaction::{CoverRect, RedactionRule};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// US Letter, used when a page tree carries no MediaBox at all
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Inherited attributes are looked up at most this many levels up the page tree
const MAX_TREE_DEPTH: usize = 32;

/// The source document with cover rectangles drawn in
#[derive(Debug)]
pub struct StagedDocument {
    pub bytes: Vec<u8>,
    pub page_count: u32,
    /// Rules that landed on an existing page
    pub covers_applied: usize,
}

/// Draw a black rectangle for every rule onto its target page.
///
/// Rules that point past the last page are skipped.
pub fn stage_redactions(
    pdf_bytes: &[u8],
    rules: &[RedactionRule],
) -> Result<StagedDocument, PdfToolsError> {
    let mut doc =
        Document::load_mem(pdf_bytes).map_err(|e| PdfToolsError::ParseError(e.to_string()))?;

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;

    let mut by_page: BTreeMap<u32, Vec<&RedactionRule>> = BTreeMap::new();
    for rule in rules {
        if pages.contains_key(&rule.page) {
            by_page.entry(rule.page).or_default().push(rule);
        } else {
            debug!(
                "Skipping redaction on page {} (document has {} pages)",
                rule.page, page_count
            );
        }
    }

    let mut covers_applied = 0;
    for (page_num, page_rules) in &by_page {
        let page_id = pages[page_num];
        let [llx, lly, urx, ury] = page_media_box(&doc, page_id);
        let (width, height) = (urx - llx, ury - lly);

        let mut ops = String::from("\nQ\n");
        for rule in page_rules {
            let rect = CoverRect::from_rule(rule, width, height);
            debug!("Page {}: cover {:?}", page_num, rect);
            ops.push_str(&rect.to_operators(llx, lly));
        }

        append_cover_content(&mut doc, page_id, ops.into_bytes())?;
        covers_applied += page_rules.len();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfToolsError::OperationError(format!("Failed to save staged PDF: {}", e)))?;

    Ok(StagedDocument {
        bytes,
        page_count,
        covers_applied,
    })
}

/// Effective MediaBox of a page as `[llx, lly, urx, ury]`, normalized so that
/// `llx <= urx` and `lly <= ury`
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    let mut current = doc.get_dictionary(page_id).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(dict) = current else { break };

        if let Some(media_box) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|obj| resolve(doc, obj).as_array().ok())
            .and_then(|arr| rect_from_array(doc, arr))
        {
            return media_box;
        }

        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| doc.get_dictionary(id))
            .ok();
    }

    DEFAULT_MEDIA_BOX
}

fn rect_from_array(doc: &Document, arr: &[Object]) -> Option<[f64; 4]> {
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, obj) in values.iter_mut().zip(arr) {
        *slot = number(resolve(doc, obj))?;
    }
    let [x0, y0, x1, y1] = values;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Wrap the page's existing content in `q ... Q` and append the covers after it,
/// so graphics state left open by the original cannot move or recolor them.
fn append_cover_content(
    doc: &mut Document,
    page_id: ObjectId,
    cover_ops: Vec<u8>,
) -> Result<(), PdfToolsError> {
    let existing = existing_content_refs(doc, page_id)?;

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let cover_id = doc.add_object(Stream::new(Dictionary::new(), cover_ops));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(cover_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfToolsError::OperationError(e.to_string()))?;
    page.set("Contents", Object::Array(contents));

    Ok(())
}

fn existing_content_refs(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<Object>, PdfToolsError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfToolsError::OperationError(e.to_string()))?;

    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    Ok(match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Object::Array(items) => items.clone(),
        _ => Vec::new(),
    })
}
