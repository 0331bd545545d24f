use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AskQuestionRequest {
    #[validate(length(min = 1, message = "question is required"))]
    pub question: String,
    pub video_id: Uuid,
}

/// Where the LLM context came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    /// Snippets returned by the similarity store
    VectorSearch,
    /// The video's full transcript
    Transcript,
    /// Neither produced any text
    Placeholder,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VectorSearch => "vector_search",
            Self::Transcript => "transcript",
            Self::Placeholder => "placeholder",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaAnswer {
    pub answer: String,
    pub question: String,
    /// Whether the similarity store answered its heartbeat
    pub using_vector_store: bool,
    pub context_source: ContextSource,
}
