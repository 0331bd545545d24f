//! Similarity search over indexed lecture transcripts.
//!
//! Transcripts are indexed per teacher in a collection named
//! `user_{teacher_id}_transcripts`, one document per video keyed by the
//! video id. The store is optional: callers treat every error here as a
//! reason to fall back to the full transcript.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("vector store request failed: {0}")]
    Transport(String),

    #[error("vector store returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("vector store response could not be decoded: {0}")]
    Decode(String),
}

/// A retrieved document with its distance to the query (lower is closer)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSnippet {
    pub document: String,
    pub distance: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Succeeds when the store is reachable
    async fn heartbeat(&self) -> Result<(), VectorStoreError>;

    /// Whether `document_id` is indexed in `collection`
    async fn has_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<bool, VectorStoreError>;

    /// Nearest documents to `text`, closest first
    async fn query(
        &self,
        collection: &str,
        text: &str,
        n_results: u32,
    ) -> Result<Vec<ScoredSnippet>, VectorStoreError>;
}

// ============================================
// Chroma HTTP client
// ============================================

pub struct ChromaClient {
    client: HttpClient,
    base_url: String,
}

impl ChromaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, VectorStoreError> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VectorStoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, VectorStoreError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| VectorStoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| VectorStoreError::Decode(e.to_string()))
    }

    /// Resolve a collection name to its id, creating it when missing
    async fn collection_id(&self, name: &str) -> Result<String, VectorStoreError> {
        let collection: CollectionResponse = self
            .post_json(
                "/collections",
                &CreateCollectionRequest {
                    name,
                    get_or_create: true,
                },
            )
            .await?;

        Ok(collection.id)
    }
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Serialize)]
struct GetRequest<'a> {
    ids: Vec<&'a str>,
    include: Vec<&'static str>,
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    ids: Vec<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_texts: Vec<&'a str>,
    n_results: u32,
    include: Vec<&'static str>,
}

/// Chroma answers one list per query text; entries may be null.
#[derive(Deserialize, Default)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Option<Vec<Option<String>>>>>,
    #[serde(default)]
    distances: Option<Vec<Option<Vec<Option<f64>>>>>,
}

impl QueryResponse {
    fn into_snippets(self) -> Vec<ScoredSnippet> {
        let documents = first_row(self.documents);
        let distances = first_row(self.distances);

        let mut snippets: Vec<ScoredSnippet> = documents
            .into_iter()
            .zip(distances)
            .filter_map(|(document, distance)| {
                Some(ScoredSnippet {
                    document: document?,
                    distance: distance?,
                })
            })
            .collect();

        snippets.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        snippets
    }
}

fn first_row<T>(rows: Option<Vec<Option<Vec<Option<T>>>>>) -> Vec<Option<T>> {
    rows.and_then(|r| r.into_iter().next().flatten())
        .unwrap_or_default()
}

#[async_trait]
impl VectorStore for ChromaClient {
    async fn heartbeat(&self) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .get(self.url("/heartbeat"))
            .send()
            .await
            .map_err(|e| VectorStoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn has_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<bool, VectorStoreError> {
        let id = self.collection_id(collection).await?;
        let found: GetResponse = self
            .post_json(
                &format!("/collections/{}/get", id),
                &GetRequest {
                    ids: vec![document_id],
                    include: Vec::new(),
                },
            )
            .await?;

        Ok(found.ids.iter().any(|found_id| found_id == document_id))
    }

    async fn query(
        &self,
        collection: &str,
        text: &str,
        n_results: u32,
    ) -> Result<Vec<ScoredSnippet>, VectorStoreError> {
        let id = self.collection_id(collection).await?;
        let results: QueryResponse = self
            .post_json(
                &format!("/collections/{}/query", id),
                &QueryRequest {
                    query_texts: vec![text],
                    n_results: n_results.max(1),
                    include: vec!["documents", "distances", "metadatas"],
                },
            )
            .await?;

        Ok(results.into_snippets())
    }
}
