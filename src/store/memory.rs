use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{ContentStore, Direction, Document, StoreQuery};

/// In-memory document store used by tests (and local development without a
/// hosted backend). Preserves insertion order so unordered queries behave
/// like the hosted store's natural order.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn add(&self, collection: &str, record: Value) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().expect("store lock");
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, record: Value) -> anyhow::Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = record,
            None => docs.push((id.to_string(), record)),
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> anyhow::Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        let docs = collections.entry(collection.to_string()).or_default();
        let (_, existing) = docs
            .iter_mut()
            .find(|(doc_id, _)| doc_id == id)
            .ok_or_else(|| anyhow::anyhow!("document {}/{} not found", collection, id))?;
        if let (Value::Object(fields), Value::Object(updates)) = (existing, patch) {
            for (key, value) in updates {
                fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        let mut collections = self.collections.lock().expect("store lock");
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>> {
        let collections = self.collections.lock().expect("store lock");
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(doc_id, fields)| Document {
                    id: doc_id.clone(),
                    fields: fields.clone(),
                })
        }))
    }

    async fn query(&self, collection: &str, query: StoreQuery) -> anyhow::Result<Vec<Document>> {
        let collections = self.collections.lock().expect("store lock");
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        if let Some((field, expected)) = &query.filter {
            docs.retain(|doc| doc.fields.get(field) == Some(expected));
        }

        if let Some((field, direction)) = &query.order_by {
            docs.sort_by(|a, b| {
                let lhs = a.fields.get(field).unwrap_or(&Value::Null);
                let rhs = b.fields.get(field).unwrap_or(&Value::Null);
                let ord = compare_fields(lhs, rhs);
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn query_orders_filters_and_limits() {
        let store = MemoryStore::new();
        for (date, status) in [
            ("2024-01-07", "approved"),
            ("2024-03-01", "pending"),
            ("2024-02-14", "approved"),
        ] {
            store
                .add("testimonies", json!({ "date": date, "status": status }))
                .await
                .unwrap();
        }

        let all = store
            .query(
                "testimonies",
                StoreQuery::order_by("date", Direction::Desc),
            )
            .await
            .unwrap();
        assert_eq!(all[0].fields["date"], "2024-03-01");
        assert_eq!(all[2].fields["date"], "2024-01-07");

        let approved = store
            .query(
                "testimonies",
                StoreQuery::default().filter("status", "approved").limit(1),
            )
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].fields["status"], "approved");
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = MemoryStore::new();
        let id = store
            .add("testimonies", json!({ "name": "Ada", "status": "pending" }))
            .await
            .unwrap();

        store
            .update("testimonies", &id, json!({ "status": "approved" }))
            .await
            .unwrap();

        let doc = store.get("testimonies", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["status"], "approved");
        assert_eq!(doc.fields["name"], "Ada");
    }

    #[tokio::test]
    async fn set_upserts_under_a_fixed_id() {
        let store = MemoryStore::new();
        store
            .set("settings", "giving", json!({ "bankName": "First Bank" }))
            .await
            .unwrap();
        store
            .set("settings", "giving", json!({ "bankName": "Union Bank" }))
            .await
            .unwrap();

        let docs = store.query("settings", StoreQuery::default()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["bankName"], "Union Bank");
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let store = MemoryStore::new();
        let id = store.add("sermons", json!({ "title": "Faith" })).await.unwrap();
        store.delete("sermons", &id).await.unwrap();
        assert!(store.get("sermons", &id).await.unwrap().is_none());
        assert_eq!(store.count("sermons").await.unwrap(), 0);
    }
}
