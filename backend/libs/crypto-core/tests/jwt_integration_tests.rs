/// Integration tests for crypto-core JWT functionality
///
/// This test module covers:
/// - Claims extraction from issued tokens
/// - Rejection of tokens signed with another secret or algorithm
/// - Rejection of malformed subjects
use chrono::Utc;
use crypto_core::jwt::{
    generate_access_token, get_user_id_from_token, initialize_jwt_secret, is_initialized,
    validate_token, Claims,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Once;
use uuid::Uuid;

const TEST_SECRET: &str = "crypto-core-integration-secret";

static INIT: Once = Once::new();

fn init() {
    INIT.call_once(|| {
        initialize_jwt_secret(TEST_SECRET).expect("Failed to initialize JWT secret");
    });
}

fn claims(sub: &str) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: sub.to_string(),
        iat: now,
        exp: now + 3600,
        token_type: "access".to_string(),
        email: "ada@example.com".to_string(),
        username: "ada".to_string(),
    }
}

#[test]
fn test_claims_carry_identity() {
    init();
    assert!(is_initialized());

    let user_id = Uuid::new_v4();
    let token = generate_access_token(user_id, "ada@example.com", "ada").unwrap();

    let data = validate_token(&token).unwrap();
    assert_eq!(data.claims.sub, user_id.to_string());
    assert_eq!(data.claims.email, "ada@example.com");
    assert_eq!(data.claims.username, "ada");
    assert_eq!(data.claims.token_type, "access");
    assert!(data.claims.exp > data.claims.iat);

    assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
}

#[test]
fn test_foreign_secret_rejected() {
    init();

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims(&Uuid::new_v4().to_string()),
        &EncodingKey::from_secret(b"some-other-service-secret"),
    )
    .unwrap();

    assert!(validate_token(&token).is_err());
}

#[test]
fn test_other_algorithm_rejected() {
    init();

    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims(&Uuid::new_v4().to_string()),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(validate_token(&token).is_err());
}

#[test]
fn test_non_uuid_subject_rejected() {
    init();

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims("not-a-uuid"),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(validate_token(&token).is_ok());
    assert!(get_user_id_from_token(&token).is_err());
}
