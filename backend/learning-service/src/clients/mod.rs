/// Outbound service clients
///
/// - `llm`: chat-completion providers used to answer questions
/// - `vector_store`: similarity search over indexed transcripts
pub mod llm;
pub mod vector_store;

pub use llm::{LlmError, LlmProvider, OpenAiCompatibleProvider};
pub use vector_store::{ChromaClient, ScoredSnippet, VectorStore, VectorStoreError};
