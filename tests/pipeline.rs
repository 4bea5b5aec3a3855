mod common;

use beer_catalog::{
    audit::{filtering::AuditFilter, GetAuditEntries},
    beers::GetBeers,
    breweries::CreateBrewery,
    filtering::{ListParams, SortDirection},
    AppError, RequestContext,
};
use common::admin;
use uuid::Uuid;

#[tokio::test]
async fn test_commands_are_audited_without_secrets() {
    let app = common::create_test_app_state().await;
    let correlation_id = Uuid::new_v4();
    let ctx = RequestContext::anonymous().with_correlation_id(correlation_id);

    app.mediator
        .send(
            &ctx,
            beer_catalog::users::CreateUser {
                username: "ola".to_string(),
                email: "ola@example.com".to_string(),
                password: "correct-horse".to_string(),
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap();

    let entries = app
        .mediator
        .send(
            &admin(),
            GetAuditEntries {
                filter: AuditFilter {
                    request_name: Some("CreateUser".to_string()),
                    ..Default::default()
                },
                list: ListParams::default(),
            },
        )
        .await
        .unwrap();

    assert_eq!(entries.total_count, 1);
    let entry = &entries.items[0];
    assert!(entry.succeeded);
    assert_eq!(entry.correlation_id, correlation_id.to_string());
    assert_eq!(entry.actor, "anonymous");

    let payload = entry.payload.as_ref().unwrap();
    assert_eq!(payload["username"], "ola");
    assert!(payload.get("password").is_none());
}

#[tokio::test]
async fn test_failed_commands_are_audited_and_queries_are_not() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(
            &admin(),
            CreateBrewery {
                input: common::brewery_input(""),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    app.mediator
        .send(&RequestContext::anonymous(), GetBeers::default())
        .await
        .unwrap();

    let entries = app
        .mediator
        .send(
            &admin(),
            GetAuditEntries {
                filter: AuditFilter::default(),
                list: ListParams::default().sorted_by("created_at", SortDirection::Desc),
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = entries.items.iter().map(|e| e.request_name.as_str()).collect();
    assert_eq!(names, vec!["CreateBrewery"]);
    assert!(!entries.items[0].succeeded);
    assert!(entries.items[0].error.is_some());
}

#[tokio::test]
async fn test_unauthorized_commands_are_not_audited() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            CreateBrewery {
                input: common::brewery_input("Pinta"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let entries = app
        .mediator
        .send(&admin(), GetAuditEntries::default())
        .await
        .unwrap();
    assert_eq!(entries.total_count, 0);
}

#[tokio::test]
async fn test_audit_trail_is_admin_only() {
    let app = common::create_test_app_state().await;
    let ola = common::sign_up(&app, "ola").await;

    let err = app
        .mediator
        .send(&common::as_user(&ola), GetAuditEntries::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_system_only_commands_reject_users() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(
            &admin(),
            beer_catalog::beers::DeleteBreweryBeers { brewery_id: 1 },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let removed = app
        .mediator
        .send(
            &RequestContext::system(),
            beer_catalog::beers::DeleteBreweryBeers { brewery_id: 1 },
        )
        .await
        .unwrap();
    assert!(removed.is_empty());
}
