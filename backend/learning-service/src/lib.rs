/// Learning Service Library
///
/// REST backend of the Lectern lecture platform: lecture videos with
/// transcripts, transcript-grounded question answering, and watch-time
/// analytics for students and admins.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: Database rows and API payloads
/// - `services`: Watch progress, analytics, video and QA logic
/// - `db`: Repositories over PostgreSQL
/// - `clients`: LLM provider and vector store clients
/// - `middleware`: JWT authentication and permission checks
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

/// Name used for logs, metrics labels and the health payload.
pub const SERVICE_NAME: &str = "learning-service";
