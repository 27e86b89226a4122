//! Milvus backend over the v2 RESTful API (`/v2/vectordb/...`).
//!
//! Every endpoint is a `POST` with a JSON body and answers with the same
//! envelope: `{"code": 0, "data": ...}` on success, `{"code": N, "message":
//! "..."}` otherwise. Non-zero codes are surfaced as [`AppError::VectorStore`].

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::sync::Mutex;

use crate::config::MilvusConfig;
use crate::error::AppError;
use crate::models::Document;
use crate::vector::{
    CollectionSpec, IndexSpec, Record, SearchRequest, VectorStore, ID_FIELD, MAX_TEXT_LENGTH,
    TEXT_FIELD, VECTOR_FIELD,
};

const STORE: &str = "Milvus";
const API_PREFIX: &str = "/v2/vectordb";

/// Response envelope shared by all v2 endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<Option<T>, AppError> {
        // Older 2.4 builds report success as 200
        if self.code == 0 || self.code == 200 {
            Ok(self.data)
        } else {
            Err(AppError::VectorStore {
                code: self.code,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct HasCollection {
    has: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResult {
    insert_count: usize,
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: i64,
    distance: f32,
    #[serde(default)]
    text: String,
}

/// Milvus client.
///
/// Holds a pooled HTTP client. Collections loaded through this client are
/// remembered and released on [`disconnect`](VectorStore::disconnect).
pub struct MilvusClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    database: Option<String>,
    loaded: Mutex<BTreeSet<String>>,
}

impl MilvusClient {
    /// Builds the client and verifies the server answers a `collections/list` call.
    pub async fn connect(config: &MilvusConfig) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::connection(STORE, e))?;

        let client = Self {
            http,
            base_url: config.base_url(),
            token: config.token.clone(),
            database: config.database.clone(),
            loaded: Mutex::new(BTreeSet::new()),
        };

        let collections: Vec<String> = client
            .post("collections/list", json!({}))
            .await
            .map_err(|e| AppError::connection(STORE, e))?
            .unwrap_or_default();
        tracing::debug!(
            "Connected to Milvus at {} ({} collections)",
            client.base_url,
            collections.len()
        );

        Ok(client)
    }

    /// Posts `body` to `/v2/vectordb/{path}` and unwraps the envelope.
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        mut body: JsonValue,
    ) -> Result<Option<T>, AppError> {
        if let (Some(db), Some(map)) = (&self.database, body.as_object_mut()) {
            map.insert("dbName".to_string(), JsonValue::String(db.clone()));
        }

        let url = format!("{}{}/{}", self.base_url, API_PREFIX, path);
        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }

    async fn release(&self, name: &str) -> Result<(), AppError> {
        self.post::<JsonValue>("collections/release", json!({ "collectionName": name }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for MilvusClient {
    async fn has_collection(&self, name: &str) -> Result<bool, AppError> {
        let data: Option<HasCollection> = self
            .post("collections/has", json!({ "collectionName": name }))
            .await?;
        Ok(data.map(|d| d.has).unwrap_or(false))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), AppError> {
        self.post::<JsonValue>("collections/create", create_collection_body(spec))
            .await?;
        tracing::debug!("Created Milvus collection {}", spec.name);
        Ok(())
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), AppError> {
        self.post::<JsonValue>("indexes/create", create_index_body(collection, index))
            .await?;
        tracing::debug!(
            "Created {} index ({}) on {}.{}",
            index.index_type,
            index.metric,
            collection,
            VECTOR_FIELD
        );
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<(), AppError> {
        self.post::<JsonValue>("collections/drop", json!({ "collectionName": name }))
            .await?;
        self.loaded.lock().await.remove(name);
        tracing::debug!("Dropped Milvus collection {}", name);
        Ok(())
    }

    async fn load_collection(&self, name: &str) -> Result<(), AppError> {
        self.post::<JsonValue>("collections/load", json!({ "collectionName": name }))
            .await?;
        self.loaded.lock().await.insert(name.to_string());
        Ok(())
    }

    async fn insert(&self, collection: &str, records: &[Record]) -> Result<usize, AppError> {
        if records.is_empty() {
            return Ok(0);
        }
        if let Some(record) = records.iter().find(|r| r.text.chars().count() > MAX_TEXT_LENGTH) {
            return Err(AppError::Validation(format!(
                "text of record {} exceeds {} characters",
                record.id, MAX_TEXT_LENGTH
            )));
        }

        let data: Option<InsertResult> = self
            .post(
                "entities/insert",
                json!({ "collectionName": collection, "data": records }),
            )
            .await?;
        Ok(data.map(|d| d.insert_count).unwrap_or(0))
    }

    async fn flush(&self, collection: &str) -> Result<(), AppError> {
        self.post::<JsonValue>("collections/flush", json!({ "collectionName": collection }))
            .await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<Document>, AppError> {
        let hits: Vec<Hit> = self
            .post("entities/search", search_body(request))
            .await?
            .unwrap_or_default();

        Ok(hits
            .into_iter()
            .map(|hit| Document::new(hit.id, hit.text, hit.distance))
            .collect())
    }

    async fn disconnect(&self) -> Result<(), AppError> {
        let loaded = std::mem::take(&mut *self.loaded.lock().await);
        for name in loaded {
            if let Err(e) = self.release(&name).await {
                tracing::warn!("Failed to release collection {}: {}", name, e);
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldSchema {
    field_name: &'static str,
    data_type: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    element_type_params: Option<JsonValue>,
}

fn create_collection_body(spec: &CollectionSpec) -> JsonValue {
    let fields = [
        FieldSchema {
            field_name: ID_FIELD,
            data_type: "Int64",
            is_primary: true,
            element_type_params: None,
        },
        FieldSchema {
            field_name: TEXT_FIELD,
            data_type: "VarChar",
            is_primary: false,
            element_type_params: Some(json!({ "max_length": MAX_TEXT_LENGTH })),
        },
        FieldSchema {
            field_name: VECTOR_FIELD,
            data_type: "FloatVector",
            is_primary: false,
            element_type_params: Some(json!({ "dim": spec.dimension })),
        },
    ];

    json!({
        "collectionName": spec.name,
        "schema": {
            "autoId": false,
            "enableDynamicField": false,
            "fields": fields,
        },
    })
}

fn create_index_body(collection: &str, index: &IndexSpec) -> JsonValue {
    json!({
        "collectionName": collection,
        "indexParams": [{
            "fieldName": VECTOR_FIELD,
            "indexName": format!("{}_index", VECTOR_FIELD),
            "metricType": index.metric.as_str(),
            "indexType": index.index_type.as_str(),
            "params": { "nlist": index.nlist },
        }],
    })
}

fn search_body(request: &SearchRequest<'_>) -> JsonValue {
    json!({
        "collectionName": request.collection,
        "data": [request.vector],
        "annsField": VECTOR_FIELD,
        "limit": request.top_k,
        "outputFields": [TEXT_FIELD],
        "searchParams": {
            "metricType": request.metric.as_str(),
            "params": { "nprobe": request.nprobe },
        },
    })
}
