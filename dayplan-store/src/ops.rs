//! Generic data-access operations, parameterized by collection name.
//!
//! Soft lookups return `Option`/`bool` so the caller decides what missing
//! data means; `must_` forms convert not-found into [`StoreError::NotFound`]
//! and are meant to be propagated straight to the request boundary.

use futures::TryStreamExt;
use mongodb::bson::{doc, from_document, to_document, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::Cursor;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Store;
use crate::error::{Result, StoreError};
use crate::options::QueryOptions;

/// Matched/modified counts reported by update operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

impl From<mongodb::results::UpdateResult> for UpdateSummary {
    fn from(result: mongodb::results::UpdateResult) -> Self {
        Self { matched: result.matched_count, modified: result.modified_count }
    }
}

impl Store {
    /// Point lookup by `_id`. `None` when no document matches.
    pub async fn find_by_id<T>(&self, collection: &str, id: impl Into<Bson>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let id = id.into();
        let _watch = self.watch(collection, "findById").id(&id);
        Ok(self.collection::<T>(collection).find_one(doc! { "_id": id }).await?)
    }

    /// Point lookup by `_id`; not-found is an error.
    pub async fn must_find_by_id<T>(&self, collection: &str, id: impl Into<Bson>) -> Result<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let id = id.into();
        let key = id.to_string();
        self.find_by_id(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, key))
    }

    /// Single-document query by filter. `None` when nothing matches.
    pub async fn find_one<T>(&self, collection: &str, filter: Document) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let _watch = self.watch(collection, "findOne").query(&filter);
        Ok(self.collection::<T>(collection).find_one(filter).await?)
    }

    /// Single-document query by filter; not-found is an error.
    pub async fn must_find_one<T>(&self, collection: &str, filter: Document) -> Result<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let key = filter.to_string();
        self.find_one(collection, filter)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, key))
    }

    /// All documents matching the filter.
    pub async fn find_all<T>(&self, collection: &str, filter: Document) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let _watch = self.watch(collection, "find").query(&filter);
        let cursor = self.collection::<T>(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// All documents matching the filter, with sort/offset/limit/projection.
    pub async fn find_with_options<T>(
        &self,
        collection: &str,
        filter: Document,
        options: QueryOptions,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let _watch = self.watch(collection, "find").query(&filter);
        let cursor = self
            .collection::<T>(collection)
            .find(filter)
            .with_options(options.to_find_options())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Typed cursor over the query results.
    ///
    /// The cursor is not restartable; issue a fresh query to iterate again.
    pub async fn stream<T>(
        &self,
        collection: &str,
        filter: Document,
        options: QueryOptions,
    ) -> Result<Cursor<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        Ok(self
            .collection::<T>(collection)
            .find(filter)
            .with_options(options.to_find_options())
            .await?)
    }

    /// Stream query results, invoking the callback once per row.
    ///
    /// Stops at the first callback error or cursor error.
    pub async fn for_each<T, F>(&self, collection: &str, filter: Document, mut f: F) -> Result<()>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
        F: FnMut(T) -> Result<()>,
    {
        let _watch = self.watch(collection, "iterate").query(&filter);
        let mut cursor = self.stream(collection, filter, QueryOptions::default()).await?;
        while let Some(row) = cursor.try_next().await? {
            f(row)?;
        }
        Ok(())
    }

    /// Count of documents matching the filter.
    pub async fn count(&self, collection: &str, filter: Document) -> Result<u64> {
        let _watch = self.watch(collection, "count").query(&filter);
        Ok(self.collection::<Document>(collection).count_documents(filter).await?)
    }

    /// Distinct values of a field across documents matching the filter.
    pub async fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: Document,
    ) -> Result<Vec<Bson>> {
        let _watch = self.watch(collection, "distinct").query(&filter);
        Ok(self.collection::<Document>(collection).distinct(field, filter).await?)
    }

    /// Insert a single document; returns the assigned `_id`.
    pub async fn insert_one<T>(&self, collection: &str, document: &T) -> Result<Bson>
    where
        T: Serialize + Send + Sync,
    {
        let _watch = self.watch(collection, "insert");
        let result = self.collection::<T>(collection).insert_one(document).await?;
        Ok(result.inserted_id)
    }

    /// Insert a batch of documents; returns the number inserted.
    pub async fn insert_many<T>(&self, collection: &str, documents: &[T]) -> Result<usize>
    where
        T: Serialize + Send + Sync,
    {
        if documents.is_empty() {
            return Ok(0);
        }
        let _watch = self.watch(collection, "bulkInsert").bulk_count(documents.len());
        let result = self.collection::<T>(collection).insert_many(documents).await?;
        Ok(result.inserted_ids.len())
    }

    /// Apply an update document to the document with the given `_id`.
    pub async fn update_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        update: Document,
    ) -> Result<UpdateSummary> {
        let id = id.into();
        let _watch = self.watch(collection, "updateById").id(&id);
        let result = self
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, update)
            .await?;
        Ok(result.into())
    }

    /// Apply an update document to the first document matching the filter.
    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary> {
        let _watch = self.watch(collection, "update").query(&filter);
        let result = self.collection::<Document>(collection).update_one(filter, update).await?;
        Ok(result.into())
    }

    /// Apply an update document to every document matching the filter.
    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary> {
        let _watch = self.watch(collection, "update").query(&filter);
        let result = self.collection::<Document>(collection).update_many(filter, update).await?;
        Ok(result.into())
    }

    /// Partial update: `$set` the fields of `patch` on the given document.
    pub async fn patch_by_id<T>(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        patch: &T,
    ) -> Result<UpdateSummary>
    where
        T: Serialize + Send + Sync,
    {
        let id = id.into();
        let _watch = self.watch(collection, "updateById").id(&id);
        let fields = to_document(patch)?;
        let result = self
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(result.into())
    }

    /// Update the first match, inserting a new document when none exists.
    pub async fn upsert_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary> {
        let _watch = self.watch(collection, "update").query(&filter);
        let result = self
            .collection::<Document>(collection)
            .update_one(filter, update)
            .upsert(true)
            .await?;
        Ok(result.into())
    }

    /// Update by `_id`, inserting a new document when none exists.
    pub async fn upsert_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        update: Document,
    ) -> Result<UpdateSummary> {
        let id = id.into();
        let _watch = self.watch(collection, "updateById").id(&id);
        let result = self
            .collection::<Document>(collection)
            .update_one(doc! { "_id": id }, update)
            .upsert(true)
            .await?;
        Ok(result.into())
    }

    /// Clear the `deletedTime` soft-delete marker on a document.
    pub async fn unarchive_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
    ) -> Result<UpdateSummary> {
        self.update_by_id(collection, id, doc! { "$set": { "deletedTime": Bson::Null } }).await
    }

    /// Find-and-modify by `_id`, returning the updated document.
    pub async fn find_by_id_and_update<T>(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        update: Document,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize + Send + Sync,
    {
        let id = id.into();
        let _watch = self.watch(collection, "updateById").id(&id);
        let options =
            FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        Ok(self
            .collection::<T>(collection)
            .find_one_and_update(doc! { "_id": id }, update)
            .with_options(options)
            .await?)
    }

    /// Find-and-modify by `_id`; not-found is an error.
    pub async fn must_find_by_id_and_update<T>(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        update: Document,
    ) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Send + Sync,
    {
        let id = id.into();
        let key = id.to_string();
        self.find_by_id_and_update(collection, id, update)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, key))
    }

    /// Find-and-modify by filter, returning the updated document.
    pub async fn find_one_and_update<T>(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize + Send + Sync,
    {
        let _watch = self.watch(collection, "update").query(&filter);
        let options =
            FindOneAndUpdateOptions::builder().return_document(ReturnDocument::After).build();
        Ok(self
            .collection::<T>(collection)
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?)
    }

    /// Delete by `_id`; returns whether a document was removed.
    pub async fn delete_by_id(&self, collection: &str, id: impl Into<Bson>) -> Result<bool> {
        let id = id.into();
        let _watch = self.watch(collection, "removeById").id(&id);
        let result = self.collection::<Document>(collection).delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    /// Delete by `_id`; not-found is an error.
    pub async fn must_delete_by_id(&self, collection: &str, id: impl Into<Bson>) -> Result<()> {
        let id = id.into();
        let key = id.to_string();
        if self.delete_by_id(collection, id).await? {
            Ok(())
        } else {
            Err(StoreError::not_found(collection, key))
        }
    }

    /// Delete the first match; a missing document is not an error.
    pub async fn delete_one(&self, collection: &str, filter: Document) -> Result<bool> {
        let _watch = self.watch(collection, "remove").query(&filter);
        let result = self.collection::<Document>(collection).delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    /// Delete every match; returns the number removed.
    pub async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64> {
        let _watch = self.watch(collection, "remove").query(&filter);
        let result = self.collection::<Document>(collection).delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    /// Run an aggregation pipeline, returning the first result.
    pub async fn aggregate_one<T>(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let _watch = self.watch(collection, "pipe").query(&doc! { "pipeline": pipeline.clone() });
        let mut cursor = self.collection::<Document>(collection).aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Run an aggregation pipeline; an empty result is an error.
    pub async fn must_aggregate_one<T>(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<T>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let key = format!("pipeline of {} stages", pipeline.len());
        self.aggregate_one(collection, pipeline)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, key))
    }

    /// Run an aggregation pipeline, collecting every result.
    pub async fn aggregate_all<T>(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let _watch = self.watch(collection, "pipe").query(&doc! { "pipeline": pipeline.clone() });
        let mut cursor = self.collection::<Document>(collection).aggregate(pipeline).await?;
        let mut results = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            results.push(from_document(document)?);
        }
        Ok(results)
    }
}
