//! Overlays AI annotations onto the authoritative record list.
//!
//! Only `ai_insight` and `is_key_record` ever change. Record identity, order and
//! every stored field pass through untouched.

use crate::models::{AnnotatedRecord, RecordAnnotation};
use std::collections::HashMap;

/// Merges `annotations` into `originals` by record id.
///
/// Originals without an annotation pass through as they were; annotations for ids
/// not in `originals` are ignored. When an id appears twice in `annotations` the
/// last one wins.
#[must_use]
pub fn reconcile(
    originals: Vec<AnnotatedRecord>,
    annotations: &[RecordAnnotation],
) -> Vec<AnnotatedRecord> {
    let lookup: HashMap<&str, &RecordAnnotation> = annotations
        .iter()
        .map(|annotation| (annotation.id.as_str(), annotation))
        .collect();

    originals
        .into_iter()
        .map(|mut item| {
            if let Some(annotation) = lookup.get(item.id()) {
                item.ai_insight.clone_from(&annotation.ai_insight);
                item.is_key_record = Some(annotation.is_key_record);
            }
            item
        })
        .collect()
}

/// Marks every record with `message` as its insight, keeping `is_key_record` as it was.
#[must_use]
pub fn mark_failed(originals: Vec<AnnotatedRecord>, message: &str) -> Vec<AnnotatedRecord> {
    originals
        .into_iter()
        .map(|mut item| {
            item.ai_insight = Some(message.to_string());
            item
        })
        .collect()
}
