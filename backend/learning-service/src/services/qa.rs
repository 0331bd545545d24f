//! QA service - answers student questions about a lecture video.
//!
//! Context comes from the similarity store when it has a relevant snippet,
//! otherwise from the video's full transcript. Vector store trouble never
//! fails a request; only the LLM call can.

use crate::clients::{LlmProvider, VectorStore};
use crate::config::VectorStoreConfig;
use crate::error::Result;
use crate::metrics::learning::{
    LLM_REQUEST_DURATION_SECONDS, QA_REQUESTS_TOTAL, VECTOR_FALLBACK_TOTAL,
};
use crate::models::{ContextSource, QaAnswer, Video};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const PLACEHOLDER_CONTEXT: &str = "No transcript available for this video.";
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate an answer.";

const TEACHER_INSTRUCTION: &str = "You are a teacher. Act as if this video is your own. \
Answer the following question to the best of your ability, using the context provided. \
If the answer isn't directly in the context, use your expertise to provide a helpful and \
informative response. Answer the question directly and concisely, without asking any \
follow-up questions or mentioning about the video or context.";

#[derive(Debug, Clone, Copy)]
pub struct QaSettings {
    /// Snippets at or beyond this distance are not relevant enough
    pub distance_threshold: f64,
    pub n_results: u32,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self {
            distance_threshold: 1.5,
            n_results: 1,
        }
    }
}

impl From<&VectorStoreConfig> for QaSettings {
    fn from(config: &VectorStoreConfig) -> Self {
        Self {
            distance_threshold: config.distance_threshold,
            n_results: config.n_results,
        }
    }
}

/// Context handed to the LLM and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedContext {
    pub text: String,
    pub source: ContextSource,
    /// Whether the vector store answered its heartbeat
    pub using_vector_store: bool,
}

enum Lookup {
    Relevant(String),
    Fallback(&'static str),
}

pub struct QaService {
    llm: Arc<dyn LlmProvider>,
    vector_store: Option<Arc<dyn VectorStore>>,
    settings: QaSettings,
}

impl QaService {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        vector_store: Option<Arc<dyn VectorStore>>,
        settings: QaSettings,
    ) -> Self {
        Self {
            llm,
            vector_store,
            settings,
        }
    }

    pub fn has_vector_store(&self) -> bool {
        self.vector_store.is_some()
    }

    /// Heartbeat of the configured vector store; `None` when disabled
    pub async fn vector_store_reachable(&self) -> Option<bool> {
        match &self.vector_store {
            Some(store) => Some(store.heartbeat().await.is_ok()),
            None => None,
        }
    }

    /// Answer `question` about `video`
    pub async fn answer(&self, video: &Video, question: &str) -> Result<QaAnswer> {
        let context = self.select_context(video, question).await;
        QA_REQUESTS_TOTAL
            .with_label_values(&[context.source.as_str()])
            .inc();

        let prompt = build_prompt(&context.text, question);
        debug!(
            video_id = %video.id,
            context_len = context.text.len(),
            source = context.source.as_str(),
            "context selected for question"
        );

        let started = Instant::now();
        let completion = self.llm.complete(&prompt).await;
        let outcome = if completion.is_ok() { "success" } else { "error" };
        LLM_REQUEST_DURATION_SECONDS
            .with_label_values(&[self.llm.name(), outcome])
            .observe(started.elapsed().as_secs_f64());

        let content = completion.map_err(|e| {
            warn!(video_id = %video.id, error = %e, "LLM completion failed");
            e
        })?;

        let answer = if content.trim().is_empty() {
            FALLBACK_ANSWER.to_string()
        } else {
            content
        };

        Ok(QaAnswer {
            answer,
            question: question.to_string(),
            using_vector_store: context.using_vector_store,
            context_source: context.source,
        })
    }

    /// Pick the LLM context for a question. Never fails.
    pub async fn select_context(&self, video: &Video, question: &str) -> SelectedContext {
        let Some(store) = &self.vector_store else {
            return transcript_context(video, false, "disabled");
        };

        if let Err(e) = store.heartbeat().await {
            warn!(error = %e, "vector store unavailable, using full transcript");
            return transcript_context(video, false, "unreachable");
        }

        match self.lookup(store.as_ref(), video, question).await {
            Ok(Lookup::Relevant(text)) if text.trim().is_empty() => SelectedContext {
                text: PLACEHOLDER_CONTEXT.to_string(),
                source: ContextSource::Placeholder,
                using_vector_store: true,
            },
            Ok(Lookup::Relevant(text)) => SelectedContext {
                text,
                source: ContextSource::VectorSearch,
                using_vector_store: true,
            },
            Ok(Lookup::Fallback(reason)) => transcript_context(video, true, reason),
            Err(e) => {
                warn!(video_id = %video.id, error = %e, "vector store lookup failed");
                transcript_context(video, true, "error")
            }
        }
    }

    async fn lookup(
        &self,
        store: &dyn VectorStore,
        video: &Video,
        question: &str,
    ) -> std::result::Result<Lookup, crate::clients::VectorStoreError> {
        let collection = video.transcript_collection();
        let document_id = video.id.to_string();

        if !store.has_document(&collection, &document_id).await? {
            return Ok(Lookup::Fallback("not_indexed"));
        }

        let snippets = store
            .query(&collection, question, self.settings.n_results)
            .await?;

        let Some(closest) = snippets
            .iter()
            .map(|s| s.distance)
            .min_by(|a, b| a.total_cmp(b))
        else {
            return Ok(Lookup::Fallback("no_results"));
        };

        if closest >= self.settings.distance_threshold {
            info!(
                video_id = %video.id,
                distance = closest,
                threshold = self.settings.distance_threshold,
                "closest snippet not relevant enough"
            );
            return Ok(Lookup::Fallback("not_relevant"));
        }

        let text = snippets
            .into_iter()
            .map(|s| s.document)
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(Lookup::Relevant(text))
    }
}

fn transcript_context(video: &Video, using_vector_store: bool, reason: &str) -> SelectedContext {
    VECTOR_FALLBACK_TOTAL.with_label_values(&[reason]).inc();

    let transcript = video.transcript_text();
    if transcript.trim().is_empty() {
        return SelectedContext {
            text: PLACEHOLDER_CONTEXT.to_string(),
            source: ContextSource::Placeholder,
            using_vector_store,
        };
    }

    SelectedContext {
        text: transcript.to_string(),
        source: ContextSource::Transcript,
        using_vector_store,
    }
}

/// Teacher persona instruction followed by the context and the question
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContext: {}\nQuestion: {}",
        TEACHER_INSTRUCTION, context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::llm::MockLlmProvider;
    use crate::clients::vector_store::MockVectorStore;
    use crate::clients::{LlmError, ScoredSnippet, VectorStoreError};
    use chrono::Utc;
    use uuid::Uuid;

    fn video(transcript: Option<&str>) -> Video {
        Video {
            id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            title: "Eigenvalues".into(),
            description: "Linear algebra".into(),
            video_url: None,
            duration_secs: Some(600.0),
            transcript: transcript.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn idle_llm() -> Arc<dyn LlmProvider> {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete().never();
        llm.expect_name().return_const("mock".to_string());
        Arc::new(llm)
    }

    fn service(store: Option<MockVectorStore>) -> QaService {
        QaService::new(
            idle_llm(),
            store.map(|s| Arc::new(s) as Arc<dyn VectorStore>),
            QaSettings::default(),
        )
    }

    fn reachable_store() -> MockVectorStore {
        let mut store = MockVectorStore::new();
        store.expect_heartbeat().returning(|| Ok(()));
        store
    }

    #[tokio::test]
    async fn test_no_store_uses_transcript() {
        let ctx = service(None)
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.text, "full transcript");
        assert_eq!(ctx.source, ContextSource::Transcript);
        assert!(!ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_unreachable_store_uses_transcript() {
        let mut store = MockVectorStore::new();
        store
            .expect_heartbeat()
            .returning(|| Err(VectorStoreError::Transport("refused".into())));
        store.expect_has_document().never();

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.source, ContextSource::Transcript);
        assert!(!ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_unindexed_video_uses_transcript() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| Ok(false));
        store.expect_query().never();

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.source, ContextSource::Transcript);
        assert!(ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_relevant_snippets_are_joined() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| Ok(true));
        store.expect_query().returning(|_, _, _| {
            Ok(vec![
                ScoredSnippet {
                    document: "first".into(),
                    distance: 0.3,
                },
                ScoredSnippet {
                    document: "second".into(),
                    distance: 1.7,
                },
            ])
        });

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.text, "first\n\nsecond");
        assert_eq!(ctx.source, ContextSource::VectorSearch);
        assert!(ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_blank_relevant_snippets_use_placeholder() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| Ok(true));
        store.expect_query().returning(|_, _, _| {
            Ok(vec![ScoredSnippet {
                document: "  ".into(),
                distance: 0.4,
            }])
        });

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.text, PLACEHOLDER_CONTEXT);
        assert_eq!(ctx.source, ContextSource::Placeholder);
        assert!(ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_distant_snippet_falls_back() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| Ok(true));
        store.expect_query().returning(|_, _, _| {
            Ok(vec![ScoredSnippet {
                document: "unrelated".into(),
                distance: 1.5,
            }])
        });

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.text, "full transcript");
        assert_eq!(ctx.source, ContextSource::Transcript);
    }

    #[tokio::test]
    async fn test_empty_query_result_falls_back() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| Ok(true));
        store.expect_query().returning(|_, _, _| Ok(Vec::new()));

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.source, ContextSource::Transcript);
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back() {
        let mut store = reachable_store();
        store.expect_has_document().returning(|_, _| {
            Err(VectorStoreError::Api {
                status: 500,
                body: "boom".into(),
            })
        });

        let ctx = service(Some(store))
            .select_context(&video(Some("full transcript")), "q")
            .await;

        assert_eq!(ctx.source, ContextSource::Transcript);
        assert!(ctx.using_vector_store);
    }

    #[tokio::test]
    async fn test_missing_transcript_uses_placeholder() {
        let ctx = service(None).select_context(&video(Some("   ")), "q").await;

        assert_eq!(ctx.text, PLACEHOLDER_CONTEXT);
        assert_eq!(ctx.source, ContextSource::Placeholder);
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("ctx", "What is an eigenvector?");

        assert!(prompt.starts_with("You are a teacher. Act as if this video is your own."));
        assert!(prompt.ends_with("\n\nContext: ctx\nQuestion: What is an eigenvector?"));
    }

    #[tokio::test]
    async fn test_answer_passes_prompt_and_reports_source() {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete()
            .withf(|prompt| prompt.contains("Context: full transcript"))
            .returning(|_| Ok("An eigenvector keeps its direction.".to_string()));
        llm.expect_name().return_const("mock".to_string());

        let qa = QaService::new(Arc::new(llm), None, QaSettings::default());
        let answer = qa
            .answer(&video(Some("full transcript")), "What is an eigenvector?")
            .await
            .unwrap();

        assert_eq!(answer.answer, "An eigenvector keeps its direction.");
        assert_eq!(answer.question, "What is an eigenvector?");
        assert_eq!(answer.context_source, ContextSource::Transcript);
        assert!(!answer.using_vector_store);
    }

    #[tokio::test]
    async fn test_empty_completion_uses_fallback_answer() {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete().returning(|_| Ok("  ".to_string()));
        llm.expect_name().return_const("mock".to_string());

        let qa = QaService::new(Arc::new(llm), None, QaSettings::default());
        let answer = qa.answer(&video(None), "q").await.unwrap();

        assert_eq!(answer.answer, FALLBACK_ANSWER);
        assert_eq!(answer.context_source, ContextSource::Placeholder);
    }

    #[tokio::test]
    async fn test_llm_failure_is_upstream_error() {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete().returning(|_| {
            Err(LlmError::Api {
                status: 503,
                body: "overloaded".into(),
            })
        });
        llm.expect_name().return_const("mock".to_string());

        let qa = QaService::new(Arc::new(llm), None, QaSettings::default());
        let err = qa.answer(&video(Some("t")), "q").await.unwrap_err();

        assert!(matches!(err, crate::error::AppError::Upstream(_)));
    }
}
