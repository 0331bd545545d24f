/// Configuration management for Learning Service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// `main` when present). Production refuses to start with unsafe defaults.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "lectern-dev-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Bearer token and admin settings
    pub auth: AuthConfig,
    /// LLM completion provider
    pub llm: LlmConfig,
    /// Optional transcript similarity store
    pub vector_store: VectorStoreConfig,
    /// Watch progress rules
    pub progress: ProgressConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Pool size override; when unset the `DB_MAX_CONNECTIONS` value stands
    pub max_connections: Option<u32>,
}

impl DatabaseConfig {
    /// Layer service-level settings over the shared pool config.
    pub fn apply_to(&self, pool: &mut db_pool::DbConfig) {
        if let Some(max) = self.max_connections {
            pool.max_connections = max;
        }
    }
}

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens
    pub jwt_secret: String,
    /// Usernames allowed to read admin analytics regardless of role
    pub admin_usernames: Vec<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("admin_usernames", &self.admin_usernames)
            .finish()
    }
}

/// LLM provider configuration (OpenAI-compatible chat completions)
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Base URL; `None` disables the similarity step entirely
    pub url: Option<String>,
    /// Snippets are used only when the closest distance is below this
    pub distance_threshold: f64,
    /// Number of snippets requested per question
    pub n_results: u32,
    pub timeout_ms: u64,
}

/// Watch progress rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Fraction of the video duration after which a video counts as completed
    pub completion_ratio: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let port = match lookup("LEARNING_SERVICE_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| format!("Failed to parse port '{}': {}", raw, e))?,
            None => 5000,
        };

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(value) => value,
            None if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            None => "http://localhost:5173".to_string(),
        };
        if production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if production => return Err("JWT_SECRET must be set in production".to_string()),
            _ => DEV_JWT_SECRET.to_string(),
        };

        let completion_ratio: f64 = parse_or_default(&lookup, "COMPLETION_RATIO", 0.9)?;
        if !(completion_ratio > 0.0 && completion_ratio <= 1.0) {
            return Err(format!(
                "COMPLETION_RATIO must be in (0, 1], got {}",
                completion_ratio
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: lookup("LEARNING_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgresql://localhost/lectern".to_string()),
                max_connections: parse_optional(&lookup, "DATABASE_MAX_CONNECTIONS")?,
            },
            auth: AuthConfig {
                jwt_secret,
                admin_usernames: split_list(lookup("ADMIN_USERNAMES").as_deref()),
            },
            llm: LlmConfig {
                base_url: lookup("LLM_API_BASE_URL")
                    .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                api_key: lookup("LLM_API_KEY")
                    .or_else(|| lookup("GROQ_API_KEY"))
                    .filter(|k| !k.trim().is_empty()),
                model: lookup("LLM_MODEL").unwrap_or_else(|| "mixtral-8x7b-32768".to_string()),
                temperature: parse_or_default(&lookup, "LLM_TEMPERATURE", 0.5)?,
                max_tokens: parse_or_default(&lookup, "LLM_MAX_TOKENS", 1024)?,
                timeout_secs: parse_or_default(&lookup, "LLM_TIMEOUT_SECS", 60)?,
            },
            vector_store: VectorStoreConfig {
                url: match lookup("VECTOR_STORE_URL") {
                    Some(url) if url.trim().is_empty() => None,
                    Some(url) => Some(url.trim().trim_end_matches('/').to_string()),
                    None => Some("http://localhost:8000".to_string()),
                },
                distance_threshold: parse_or_default(
                    &lookup,
                    "VECTOR_STORE_DISTANCE_THRESHOLD",
                    1.5,
                )?,
                n_results: parse_or_default(&lookup, "VECTOR_STORE_RESULTS", 1)?,
                timeout_ms: parse_or_default(&lookup, "VECTOR_STORE_TIMEOUT_MS", 3_000)?,
            },
            progress: ProgressConfig { completion_ratio },
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        None => Ok(default),
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|val| {
            val.trim()
                .parse()
                .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e))
        })
        .transpose()
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
