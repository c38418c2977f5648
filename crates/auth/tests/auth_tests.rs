use chrono::Utc;
use cineapp_auth::{
    CookieSessionResolver, Identity, Role, SessionCodec, SessionOptions, SessionResolver,
    TokenProvider, DEFAULT_ROLES_CLAIM, SESSION_COOKIE,
};

fn codec(secret: &str) -> SessionCodec {
    SessionCodec::new(secret, SessionOptions::default()).unwrap()
}

#[tokio::test]
async fn test_issued_session_resolves_with_capabilities() {
    let codec = codec("integration-secret");
    let identity = Identity::new("google-oauth2|42")
        .with_email("ana@example.com")
        .with_nickname("ana")
        .with_roles(DEFAULT_ROLES_CLAIM, &[Role::Admin, Role::Client]);
    let sealed = codec.issue(identity, Some("catalog-token".to_string())).unwrap();

    let resolver = CookieSessionResolver::new(codec);
    let header = format!("lang=es; {}={}", SESSION_COOKIE, sealed);
    let resolved = resolver.resolve(Some(&header)).await.unwrap().expect("session");

    assert!(resolved.session.capabilities.admin);
    assert!(resolved.session.capabilities.client);
    assert_eq!(resolved.session.identity.provider(), "google-oauth2");
    assert_eq!(resolved.session.access_token().await.unwrap(), "catalog-token");
    assert!(resolved.refreshed_cookie.is_some());
}

#[tokio::test]
async fn test_tampered_cookie_is_decryption_error() {
    let issuer = codec("issuer-secret");
    let sealed = issuer.issue(Identity::new("auth0|1"), None).unwrap();

    let resolver = CookieSessionResolver::new(codec("gate-secret"));
    let header = format!("{}={}", SESSION_COOKIE, sealed);
    let err = resolver.resolve(Some(&header)).await.unwrap_err();

    assert!(err.is_decryption());
}

#[tokio::test]
async fn test_custom_roles_claim() {
    let options = SessionOptions::default().with_roles_claim("https://cine/roles");
    let codec = SessionCodec::new("custom-claim-secret", options).unwrap();
    let identity = Identity::new("auth0|2")
        .with_roles("https://cine/roles", &[Role::Client])
        .with_roles(DEFAULT_ROLES_CLAIM, &[Role::Admin]);
    let sealed = codec.issue(identity, None).unwrap();

    let resolver = CookieSessionResolver::new(codec);
    let header = format!("{}={}", SESSION_COOKIE, sealed);
    let session = resolver.resolve(Some(&header)).await.unwrap().unwrap().session;

    assert!(session.capabilities.client);
    assert!(!session.capabilities.admin);
}

#[tokio::test]
async fn test_non_rolling_session_is_not_reissued() {
    let options = SessionOptions::default().with_rolling(false);
    let codec = SessionCodec::new("static-secret", options).unwrap();
    let sealed = codec.issue(Identity::new("auth0|3"), None).unwrap();

    let resolver = CookieSessionResolver::new(codec);
    let header = format!("{}={}", SESSION_COOKIE, sealed);
    let resolved = resolver
        .resolve_at(Some(&header), Utc::now().timestamp())
        .unwrap()
        .unwrap();

    assert!(resolved.refreshed_cookie.is_none());
}
