//! Viewer-side annotation cache
//!
//! Annotations are owned by the backend; the viewer keeps a cache keyed by
//! annotation id, refreshed wholesale on load and mutated optimistically
//! after each successful create/update/delete/comment call.

use osteoview_core::{Annotation, AnnotationComment, AnnotationStatus, Severity};
use std::collections::BTreeMap;

/// Cache of backend-owned annotations keyed by id
#[derive(Debug, Default)]
pub struct AnnotationCache {
    entries: BTreeMap<i64, Annotation>,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache from a freshly fetched list
    pub fn refresh(&mut self, annotations: Vec<Annotation>) {
        self.entries = annotations.into_iter().map(|a| (a.id, a)).collect();
    }

    /// Insert or replace one annotation after a successful create/update
    pub fn upsert(&mut self, annotation: Annotation) {
        self.entries.insert(annotation.id, annotation);
    }

    /// Drop one annotation after a successful delete
    pub fn remove(&mut self, id: i64) -> Option<Annotation> {
        self.entries.remove(&id)
    }

    /// Append a comment to an annotation's thread after a successful call
    pub fn push_comment(&mut self, id: i64, comment: AnnotationComment) -> bool {
        match self.entries.get_mut(&id) {
            Some(annotation) => {
                annotation.comments.push(comment);
                true
            }
            None => false,
        }
    }

    /// Update severity/status in place after a successful patch
    pub fn apply_update(
        &mut self,
        id: i64,
        severity: Option<Severity>,
        status: Option<AnnotationStatus>,
    ) -> bool {
        match self.entries.get_mut(&id) {
            Some(annotation) => {
                if let Some(severity) = severity {
                    annotation.severity = severity;
                }
                if let Some(status) = status {
                    annotation.status = status;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: i64) -> Option<&Annotation> {
        self.entries.get(&id)
    }

    /// All cached annotations in id order
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
