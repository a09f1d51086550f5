use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, generate_document_id};
use crate::models::{TodoFields, merge_fields};

#[derive(Debug, Clone)]
struct Entry {
    fields: TodoFields,
    created_at: DateTime<Utc>,
}

/// In-process collection, used for local runs without Spanner and in tests
///
/// Contents live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn new_document_id(&self) -> String {
        generate_document_id()
    }

    async fn get(&self, id: &str) -> Result<Option<TodoFields>> {
        let documents = self.documents.read().await;
        Ok(documents.get(id).map(|entry| entry.fields.clone()))
    }

    async fn set(&self, id: &str, data: &TodoFields) -> Result<()> {
        let mut documents = self.documents.write().await;
        let created_at = documents
            .get(id)
            .map(|entry| entry.created_at)
            .unwrap_or_else(Utc::now);
        documents.insert(
            id.to_string(),
            Entry {
                fields: data.clone(),
                created_at,
            },
        );
        tracing::debug!("Set document with id: {}", id);
        Ok(())
    }

    async fn update(&self, id: &str, partial: &TodoFields) -> Result<bool> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(id) {
            Some(entry) => {
                merge_fields(&mut entry.fields, partial);
                tracing::debug!("Updated document with id: {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.documents.write().await.remove(id);
        tracing::debug!("Deleted document with id: {}", id);
        Ok(())
    }

    async fn stream_all(&self) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut entries: Vec<_> = documents.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.created_at);

        Ok(entries
            .into_iter()
            .map(|(id, entry)| Document {
                id: id.clone(),
                fields: entry.fields.clone(),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> TodoFields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        let id = store.new_document_id();

        store
            .set(&id, &fields(json!({"title": "buy milk"})))
            .await
            .unwrap();

        assert_eq!(
            store.get(&id).await.unwrap(),
            Some(fields(json!({"title": "buy milk"})))
        );
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_merges_existing_document() {
        let store = MemoryStore::new();
        store
            .set("k", &fields(json!({"title": "a", "done": false})))
            .await
            .unwrap();

        let applied = store.update("k", &fields(json!({"done": true}))).await.unwrap();

        assert!(applied);
        assert_eq!(
            store.get("k").await.unwrap(),
            Some(fields(json!({"title": "a", "done": true})))
        );
    }

    #[tokio::test]
    async fn test_update_missing_document_writes_nothing() {
        let store = MemoryStore::new();

        let applied = store.update("ghost", &fields(json!({"done": true}))).await.unwrap();

        assert!(!applied);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.set("k", &fields(json!({"x": 1}))).await.unwrap();

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stream_all_in_creation_order() {
        let store = MemoryStore::new();
        for n in 0..3 {
            store
                .set(&format!("doc-{}", n), &fields(json!({"n": n})))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let ids: Vec<String> = store
            .stream_all()
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();

        assert_eq!(ids, vec!["doc-0", "doc-1", "doc-2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_disjoint_updates_keep_every_key() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.set("k", &fields(json!({"base": true}))).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut partial = TodoFields::new();
                    partial.insert(format!("key{}", n), json!(n));
                    store.update("k", &partial).await.unwrap()
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }

        let stored = store.get("k").await.unwrap().unwrap();
        assert_eq!(stored.len(), 9);
        for n in 0..8 {
            assert_eq!(stored[&format!("key{}", n)], json!(n));
        }
    }
}
