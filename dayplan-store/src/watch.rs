//! Per-operation timing instrumentation.
//!
//! Every facade call opens an [`OpWatch`] before issuing the driver
//! operation. The watch records the operation name, target collection, and
//! the serialized query/identifier/bulk-count; completion is tied to `Drop`,
//! so the measurement closes on every exit path. Watches only observe: they
//! never change an operation's result or error.

use std::time::{Duration, Instant};

use mongodb::bson::{doc, Bson, Document};

/// Timer and parameter recorder for a single database operation.
///
/// On drop, emits a slow-operation warning if elapsed wall-clock time meets
/// or exceeds the configured threshold.
pub struct OpWatch {
    collection: String,
    operation: &'static str,
    query: Option<String>,
    bulk_count: Option<usize>,
    threshold: Duration,
    started: Instant,
}

impl OpWatch {
    pub(crate) fn new(collection: &str, operation: &'static str, threshold: Duration) -> Self {
        Self {
            collection: collection.to_string(),
            operation,
            query: None,
            bulk_count: None,
            threshold,
            started: Instant::now(),
        }
    }

    /// Record the query filter.
    pub(crate) fn query(mut self, filter: &Document) -> Self {
        self.query = Some(filter.to_string());
        self
    }

    /// Record a point-lookup identifier as an `_id` filter.
    pub(crate) fn id(self, id: &Bson) -> Self {
        self.query(&doc! { "_id": id.clone() })
    }

    /// Record the document count of a bulk operation.
    pub(crate) fn bulk_count(mut self, count: usize) -> Self {
        self.bulk_count = Some(count);
        self
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        elapsed >= self.threshold
    }
}

impl Drop for OpWatch {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        if self.is_slow(elapsed) {
            tracing::warn!(
                collection = %self.collection,
                operation = self.operation,
                query = self.query.as_deref().unwrap_or("-"),
                bulk_count = self.bulk_count,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow database operation"
            );
        }
    }
}
