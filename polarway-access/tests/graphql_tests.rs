//! GraphQL schema tests — field wiring, error codes, admin scope

use std::time::Duration;

use async_graphql::Request;
use serde_json::{json, Value};

use polarway_access::{
    build_schema, AccessConfig, AccessSchema, Actor, EarlyAccessAdminService, InMemoryAdmin,
    SubscriptionTier,
};

fn setup() -> (AccessSchema, InMemoryAdmin) {
    let config = AccessConfig::new()
        .with_staff_domains(["x.com"])
        .with_rate_limit(100, Duration::from_secs(60));
    let admin = EarlyAccessAdminService::in_memory(&config);
    (build_schema(admin.service.clone()), admin)
}

async fn run(schema: &AccessSchema, actor: Option<&str>, query: &str) -> (Value, Vec<String>) {
    let mut request = Request::new(query);
    if let Some(email) = actor {
        request = request.data(Actor::new(email));
    }
    let response = schema.execute(request).await;

    let codes = response
        .errors
        .iter()
        .filter_map(|e| e.extensions.as_ref())
        .filter_map(|ext| ext.get("code"))
        .map(|code| code.to_string().trim_matches('"').to_string())
        .collect();
    (response.data.into_json().unwrap(), codes)
}

#[tokio::test]
async fn test_add_and_remove_early_access() {
    let (schema, _admin) = setup();

    let (data, codes) = run(
        &schema,
        Some("staff@x.com"),
        r#"mutation { addToEarlyAccess(email: "new@x.com", type: AI) }"#,
    )
    .await;
    assert!(codes.is_empty());
    assert_eq!(data, json!({ "addToEarlyAccess": 1 }));

    let (data, _) = run(
        &schema,
        Some("staff@x.com"),
        r#"mutation { removeEarlyAccess(email: "new@x.com") }"#,
    )
    .await;
    assert_eq!(data, json!({ "removeEarlyAccess": 1 }));
}

#[tokio::test]
async fn test_unknown_access_type_rejected_at_boundary() {
    let (schema, admin) = setup();

    let response = schema
        .execute(
            Request::new(r#"mutation { addToEarlyAccess(email: "new@x.com", type: BETA) }"#)
                .data(Actor::new("staff@x.com")),
        )
        .await;
    assert!(!response.errors.is_empty());
    assert!(admin.directory.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_error_codes() {
    let (schema, _admin) = setup();

    let (_, codes) = run(&schema, None, "{ earlyAccessUsers { id } }").await;
    assert_eq!(codes, vec!["UNAUTHENTICATED"]);

    let (_, codes) = run(&schema, Some("notstaff@y.com"), "{ earlyAccessUsers { id } }").await;
    assert_eq!(codes, vec!["FORBIDDEN"]);

    let (_, codes) = run(
        &schema,
        Some("staff@x.com"),
        r#"mutation { removeEarlyAccess(email: "ghost@x.com") }"#,
    )
    .await;
    assert_eq!(codes, vec!["USER_NOT_FOUND"]);
}

#[tokio::test]
async fn test_early_access_users_exposes_subscription_under_admin_scope() {
    let (schema, admin) = setup();
    admin
        .directory
        .register(
            "paid@example.com".into(),
            "Paid".into(),
            Some("$argon2id$fake_hash".into()),
            Some(SubscriptionTier::Pioneer),
        )
        .await
        .unwrap();

    run(
        &schema,
        Some("staff@x.com"),
        r#"mutation { addToEarlyAccess(email: "paid@example.com", type: APP) }"#,
    )
    .await;

    let (data, codes) = run(
        &schema,
        Some("staff@x.com"),
        "{ earlyAccessUsers { email name hasPassword registered emailVerified subscription } }",
    )
    .await;
    assert!(codes.is_empty());
    assert_eq!(
        data,
        json!({
            "earlyAccessUsers": [{
                "email": "paid@example.com",
                "name": "Paid",
                "hasPassword": true,
                "registered": true,
                "emailVerified": true,
                "subscription": "pioneer",
            }]
        })
    );
}

#[tokio::test]
async fn test_me_resolves_own_subscription_for_non_staff() {
    let (schema, admin) = setup();
    admin
        .directory
        .register(
            "member@y.com".into(),
            "Member".into(),
            None,
            Some(SubscriptionTier::Pioneer),
        )
        .await
        .unwrap();

    let (data, codes) = run(&schema, Some("member@y.com"), "{ me { email subscription } }").await;
    assert!(codes.is_empty());
    assert_eq!(
        data,
        json!({ "me": { "email": "member@y.com", "subscription": "pioneer" } })
    );

    let (data, _) = run(&schema, Some("nobody@y.com"), "{ me { email } }").await;
    assert_eq!(data, json!({ "me": null }));

    let (_, codes) = run(&schema, None, "{ me { email } }").await;
    assert_eq!(codes, vec!["UNAUTHENTICATED"]);
}
