//! Query modifiers applied uniformly across read operations.

use mongodb::bson::Document;
use mongodb::options::FindOptions;

/// Optional modifiers for multi-document queries.
///
/// Sort keys use the `"field"` / `"-field"` convention: a leading `-` sorts
/// that field descending.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Sort key list, applied in order
    pub sort: Vec<String>,
    /// Number of documents to skip
    pub offset: Option<u64>,
    /// Maximum number of documents to return
    pub limit: Option<i64>,
    /// Field-selection mask
    pub projection: Option<Document>,
}

impl QueryOptions {
    pub fn sort(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sort = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Sort keys as a driver sort document, or `None` when no keys are set.
    pub(crate) fn sort_document(&self) -> Option<Document> {
        if self.sort.is_empty() {
            return None;
        }
        let mut doc = Document::new();
        for key in &self.sort {
            match key.strip_prefix('-') {
                Some(field) => doc.insert(field, -1),
                None => doc.insert(key.as_str(), 1),
            };
        }
        Some(doc)
    }

    pub(crate) fn to_find_options(&self) -> FindOptions {
        FindOptions::builder()
            .sort(self.sort_document())
            .skip(self.offset)
            .limit(self.limit)
            .projection(self.projection.clone())
            .build()
    }
}
