use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ContentStore, Document, StoreQuery};

/// REST client for the hosted document database.
///
/// Wire layout, relative to the configured base URL:
///   POST   {base}/{collection}            -> {"id": "..."}
///   PUT    {base}/{collection}/{id}       (upsert)
///   PATCH  {base}/{collection}/{id}       (partial update)
///   DELETE {base}/{collection}/{id}
///   GET    {base}/{collection}/{id}       -> document or 404
///   GET    {base}/{collection}?orderBy=&direction=&limit=&where=field:value
///
/// No request timeout is configured: a hung call stays pending, matching the
/// behavior the site has always had.
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Deserialize)]
struct WireDocument {
    id: String,
    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

impl WireDocument {
    fn into_document(self) -> Document {
        Document {
            id: self.id,
            fields: Value::Object(self.fields),
        }
    }
}

impl HttpStore {
    pub fn new(base_url: &str) -> Self {
        HttpStore {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    fn query_params(query: &StoreQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some((field, direction)) = &query.order_by {
            params.push(("orderBy", field.clone()));
            params.push(("direction", direction.as_str().to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some((field, value)) = &query.filter {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            params.push(("where", format!("{}:{}", field, rendered)));
        }
        params
    }
}

#[async_trait]
impl ContentStore for HttpStore {
    async fn add(&self, collection: &str, record: Value) -> anyhow::Result<String> {
        let resp = self
            .client
            .post(self.collection_url(collection))
            .json(&record)
            .send()
            .await?
            .error_for_status()?;
        let body: AddResponse = resp.json().await?;
        Ok(body.id)
    }

    async fn set(&self, collection: &str, id: &str, record: Value) -> anyhow::Result<()> {
        self.client
            .put(self.document_url(collection, id))
            .json(&record)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> anyhow::Result<()> {
        self.client
            .patch(self.document_url(collection, id))
            .json(&patch)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        self.client
            .delete(self.document_url(collection, id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>> {
        let resp = self
            .client
            .get(self.document_url(collection, id))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let wire: WireDocument = resp.error_for_status()?.json().await?;
        Ok(Some(wire.into_document()))
    }

    async fn query(&self, collection: &str, query: StoreQuery) -> anyhow::Result<Vec<Document>> {
        let resp = self
            .client
            .get(self.collection_url(collection))
            .query(&Self::query_params(&query))
            .send()
            .await?
            .error_for_status()?;
        let wire: Vec<WireDocument> = resp.json().await?;
        Ok(wire.into_iter().map(WireDocument::into_document).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Direction;

    #[test]
    fn query_params_encode_order_limit_and_filter() {
        let q = StoreQuery::order_by("date", Direction::Desc)
            .limit(6)
            .filter("status", "approved");
        let params = HttpStore::query_params(&q);
        assert_eq!(
            params,
            vec![
                ("orderBy", "date".to_string()),
                ("direction", "desc".to_string()),
                ("limit", "6".to_string()),
                ("where", "status:approved".to_string()),
            ]
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = HttpStore::new("http://store.local/v1/");
        assert_eq!(store.collection_url("sermons"), "http://store.local/v1/sermons");
        assert_eq!(
            store.document_url("sermons", "abc"),
            "http://store.local/v1/sermons/abc"
        );
    }
}
