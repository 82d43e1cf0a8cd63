//! End-to-end client-credentials flow over the in-memory backend:
//! validation, transactional federation, claim population, and minting.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use sts_core::{OAuth2Config, SecretHashConfig};
use sts_crypto::SecretHasher;
use sts_model::{Issuer, NewOAuthClient};
use sts_oauth2::{
    AccessRequest, ClientCredentialsGrantHandler, JwtSigner, SUBJECT_URN_PREFIX, Session,
    SigningKey, StaticSigningKey, TokenSigner,
};
use sts_storage::{IssuerProvider, OAuthClientProvider, UserInfoProvider};
use sts_storage_memory::MemoryStorage;
use uuid::Uuid;

const ISSUER: &str = "https://sts.internal";
const SIGNING_SECRET: &[u8] = b"integration-test-secret";

fn config() -> OAuth2Config {
    OAuth2Config {
        access_token_issuer: ISSUER.to_string(),
        access_token_lifespan_secs: 300,
        userinfo_audience: "https://sts.internal/userinfo".to_string(),
    }
}

fn fast_store() -> MemoryStorage {
    MemoryStorage::with_hasher(SecretHasher::new(SecretHashConfig {
        memory_cost_kib: 8,
        time_cost: 1,
        parallelism: 1,
        output_length: 32,
    }))
}

#[tokio::test]
async fn client_credentials_grant_issues_a_token_for_the_federated_subject() {
    let store = fast_store();
    IssuerProvider::create(
        &store,
        Issuer::new(Uuid::now_v7(), "STS", ISSUER, "https://sts.internal/jwks"),
    )
    .await
    .unwrap();

    let created = OAuthClientProvider::create(
        &store,
        NewOAuthClient::new(Uuid::now_v7(), "reporting-service")
            .with_secret("s")
            .with_audience("api.internal")
            .with_scope("read write"),
    )
    .await
    .unwrap();
    let client = created.client;

    let handler = ClientCredentialsGrantHandler::new(Arc::new(store.clone()), &config())
        .with_signing_keys(StaticSigningKey::new("2024-08"));
    let signer = JwtSigner::new(
        ISSUER,
        SigningKey::from_hmac_secret("2024-08", SIGNING_SECRET),
    );

    let request = AccessRequest::client_credentials(client.clone())
        .with_scope("read")
        .with_audience("api.internal");
    let mut session = Session::new();

    handler.handle(&request, &mut session).await.unwrap();
    let response = signer.mint(&request, &session).unwrap();

    // Exactly one federation record, with the client ID as subject.
    let record = store
        .lookup_by_claims(ISSUER, &client.id.to_string())
        .await
        .unwrap()
        .expect("grant should have federated the client");
    assert_eq!(store.user_info_count(), 1);
    assert_eq!(record.subject, client.id.to_string());

    // The token is verifiable and carries the namespaced subject.
    let mut validation = Validation::new(Algorithm::HS384);
    validation.validate_aud = false;
    let decoded = decode::<serde_json::Value>(
        &response.access_token,
        &DecodingKey::from_secret(SIGNING_SECRET),
        &validation,
    )
    .unwrap();

    assert_eq!(
        decoded.claims["sub"],
        serde_json::json!(format!("{SUBJECT_URN_PREFIX}{}", record.id))
    );
    assert_eq!(decoded.claims["iss"], ISSUER);
    assert_eq!(decoded.claims["client_id"], client.id.to_string());
    assert!(
        decoded.claims["aud"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("api.internal"))
    );
    assert_eq!(response.scope.as_deref(), Some("read"));
}

#[tokio::test]
async fn rejected_grants_leave_no_federation_records_behind() {
    let store = fast_store();
    IssuerProvider::create(
        &store,
        Issuer::new(Uuid::now_v7(), "STS", ISSUER, "https://sts.internal/jwks"),
    )
    .await
    .unwrap();

    let client = OAuthClientProvider::create(
        &store,
        NewOAuthClient::new(Uuid::now_v7(), "svc")
            .with_secret("s")
            .with_scope("read"),
    )
    .await
    .unwrap()
    .client;

    let handler = ClientCredentialsGrantHandler::new(Arc::new(store.clone()), &config());

    let request = AccessRequest::client_credentials(client).with_scope("admin");
    let mut session = Session::new();
    handler.handle(&request, &mut session).await.unwrap_err();

    assert_eq!(store.user_info_count(), 0);
    assert!(session.subject.is_none());
}
