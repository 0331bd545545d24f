/// Shared JWT validation module for Lectern services
///
/// Bearer tokens are signed with a shared HMAC secret (HS256). The secret is
/// installed once at startup and is immutable afterwards.
///
/// ## Usage
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET required");
/// jwt::initialize_jwt_secret(&secret).expect("Failed to initialize JWT secret");
///
/// // Now tokens can be generated and validated
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Secrets shorter than this are rejected.
const MIN_SECRET_LEN: usize = 16;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, always "access" for bearer tokens
    pub token_type: String,
    /// Email address
    pub email: String,
    /// Username
    pub username: String,
}

// ============================================================================
// Key Storage
// ============================================================================

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

static JWT_KEYS: OnceCell<SigningKeys> = OnceCell::new();

/// Install the HMAC secret used for signing and validating tokens.
///
/// Can only be called once; later calls return an error.
pub fn initialize_jwt_secret(secret: &str) -> Result<()> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(anyhow!(
            "JWT secret must be at least {MIN_SECRET_LEN} bytes long"
        ));
    }

    JWT_KEYS
        .set(SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
        .map_err(|_| anyhow!("JWT secret already initialized"))
}

/// Whether [`initialize_jwt_secret`] has already succeeded.
pub fn is_initialized() -> bool {
    JWT_KEYS.get().is_some()
}

fn keys() -> Result<&'static SigningKeys> {
    JWT_KEYS.get().ok_or_else(|| {
        anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate a new access token for a user.
///
/// Issuance normally happens in the identity frontend; services use this in
/// tests and tooling.
pub fn generate_access_token(user_id: Uuid, email: &str, username: &str) -> Result<String> {
    generate_token_with_expiry(
        user_id,
        email,
        username,
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Generate an access token with an explicit lifetime (negative for already-expired tokens).
pub fn generate_token_with_expiry(
    user_id: Uuid,
    email: &str,
    username: &str,
    lifetime: Duration,
) -> Result<String> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        token_type: "access".to_string(),
        email: email.to_string(),
        username: username.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, &keys()?.encoding)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token (without the "Bearer " prefix).
///
/// Signature, algorithm and expiry are all enforced.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(token, &keys()?.decoding, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract user ID from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

// ============================================================================
// Tests
// ============================================================================
