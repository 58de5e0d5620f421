// SPDX-License-Identifier: MIT

//! JWT authentication tests.
//!
//! These tests verify that tokens created by `create_jwt` can be decoded
//! with the claims layout the middleware expects, catching compatibility
//! issues early.

use canvasai_api::middleware::auth::{create_jwt, Claims};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

#[test]
fn test_jwt_roundtrip() {
    let signing_key = b"test_signing_key_32_bytes_long!!";
    let user_id = "b2f0a7c4-5d7e-4f3a-9a1b-0c6d8e2f4a5b";

    let token = create_jwt(user_id, signing_key).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, user_id);
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_rejects_wrong_key() {
    let token = create_jwt("user-1", b"key-one-key-one-key-one-key-one!").unwrap();

    let key = DecodingKey::from_secret(b"key-two-key-two-key-two-key-two!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}
