use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Query shape supported by the hosted document store: a single order-by
/// field, an optional result cap, and an optional equality filter.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
    pub filter: Option<(String, Value)>,
}

impl StoreQuery {
    pub fn order_by(field: &str, direction: Direction) -> Self {
        StoreQuery {
            order_by: Some((field.to_string(), direction)),
            ..Default::default()
        }
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some((field.to_string(), value.into()));
        self
    }
}

/// One document from the store: opaque id plus its fields as JSON.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn parse<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_value(self.fields.clone())?)
    }
}

/// Thin typed client over the hosted document database. Timestamps are
/// assigned by the caller at intake time; the store persists records as-is.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create a record with a store-assigned id.
    async fn add(&self, collection: &str, record: Value) -> anyhow::Result<String>;

    /// Upsert a record under a known id.
    async fn set(&self, collection: &str, id: &str, record: Value) -> anyhow::Result<()>;

    /// Patch only the given fields of an existing record.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> anyhow::Result<()>;

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()>;

    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>>;

    async fn query(&self, collection: &str, query: StoreQuery) -> anyhow::Result<Vec<Document>>;

    /// Raw record count for the stats panel.
    async fn count(&self, collection: &str) -> anyhow::Result<usize> {
        Ok(self.query(collection, StoreQuery::default()).await?.len())
    }
}
