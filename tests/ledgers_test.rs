//! Ledger CRUD, list filtering, sorting, and pagination.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::TestApp;

async fn setup_categories(app: &TestApp) -> (i64, i64) {
    let (status, sub) = app
        .post(
            "/api/v1/account-subcategories",
            json!({"name": "Cash Accounts", "category": "Assets"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, group) = app
        .post(
            "/api/v1/account-group-categories",
            json!({"name": "Current Assets"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    (sub["id"].as_i64().unwrap(), group["id"].as_i64().unwrap())
}

fn ledger_body(name: &str, code: &str, sub: i64, group: i64, active: bool) -> Value {
    json!({
        "name": name,
        "code": code,
        "subcategory_id": sub,
        "group_category_id": group,
        "balance_type": "Debit",
        "opening_balance": "1000.00",
        "description": format!("{name} ledger"),
        "is_active": active,
    })
}

#[tokio::test]
async fn ledger_crud_roundtrip() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    let (status, created) = app
        .post(
            "/api/v1/ledgers",
            ledger_body("Cash in Hand", "1001", sub, group, true),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["current_balance"], created["opening_balance"]);

    let (status, fetched) = app.get(&format!("/api/v1/ledgers/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Cash in Hand");

    let (status, updated) = app
        .put(
            &format!("/api/v1/ledgers/{id}"),
            ledger_body("Petty Cash", "1001", sub, group, true),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Petty Cash");

    let (status, _) = app.delete(&format!("/api/v1/ledgers/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/v1/ledgers/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_ledger_code_is_a_conflict() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    let (status, _) = app
        .post(
            "/api/v1/ledgers",
            ledger_body("Cash", "1001", sub, group, true),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/v1/ledgers",
            ledger_body("Another Cash", "1001", sub, group, true),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("1001"));
}

#[tokio::test]
async fn active_filter_returns_only_active_rows() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    for (name, code, active) in [
        ("Cash in Hand", "1001", true),
        ("Old Bank Account", "1002", false),
        ("Mudaraba Savings", "1003", true),
    ] {
        let (status, _) = app
            .post(
                "/api/v1/ledgers",
                ledger_body(name, code, sub, group, active),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/v1/ledgers?is_active=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    for row in body["results"].as_array().unwrap() {
        assert_eq!(row["is_active"], true);
    }

    // No filter: all three come back.
    let (_, all) = app.get("/api/v1/ledgers").await;
    assert_eq!(all["count"], 3);
}

#[tokio::test]
async fn search_matches_name_code_and_description() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    for (name, code) in [("Cash in Hand", "1001"), ("Bank Asia", "2001")] {
        app.post(
            "/api/v1/ledgers",
            ledger_body(name, code, sub, group, true),
        )
        .await;
    }

    // Case-insensitive substring on name.
    let (_, body) = app.get("/api/v1/ledgers?search=cash").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Cash in Hand");

    // Substring on code.
    let (_, body) = app.get("/api/v1/ledgers?search=200").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["code"], "2001");

    // No match.
    let (_, body) = app.get("/api/v1/ledgers?search=nonexistent").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn sort_order_param_toggles_direction() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    for (name, code) in [("Bravo", "2"), ("Alpha", "1"), ("Charlie", "3")] {
        app.post(
            "/api/v1/ledgers",
            ledger_body(name, code, sub, group, true),
        )
        .await;
    }

    let (_, asc) = app.get("/api/v1/ledgers?sort_by=name").await;
    let names: Vec<&str> = asc["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);

    let (_, desc) = app
        .get("/api/v1/ledgers?sort_by=name&sort_order=desc")
        .await;
    let names: Vec<&str> = desc["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Charlie", "Bravo", "Alpha"]);
}

#[tokio::test]
async fn pagination_envelope_is_consistent() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    for i in 0..5 {
        app.post(
            "/api/v1/ledgers",
            ledger_body(&format!("Ledger {i}"), &format!("C{i}"), sub, group, true),
        )
        .await;
    }

    let (_, page) = app.get("/api/v1/ledgers?page=2&page_size=2").await;
    assert_eq!(page["count"], 5);
    assert_eq!(page["current_page"], 2);
    assert_eq!(page["num_pages"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn ledger_options_lists_active_only() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    app.post(
        "/api/v1/ledgers",
        ledger_body("Active One", "1", sub, group, true),
    )
    .await;
    app.post(
        "/api/v1/ledgers",
        ledger_body("Inactive One", "2", sub, group, false),
    )
    .await;

    let (status, options) = app.get("/api/v1/ledgers/options").await;
    assert_eq!(status, StatusCode::OK);
    let options = options.as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["name"], "Active One");
}

#[tokio::test]
async fn category_group_and_date_filters_narrow_the_list() {
    let app = TestApp::spawn().await;
    let (asset_sub, current_group) = setup_categories(&app).await;

    let (_, sub) = app
        .post(
            "/api/v1/account-subcategories",
            json!({"name": "Bank Loans", "category": "Liabilities"}),
        )
        .await;
    let liability_sub = sub["id"].as_i64().unwrap();
    let (_, group) = app
        .post(
            "/api/v1/account-group-categories",
            json!({"name": "Long Term Loans"}),
        )
        .await;
    let loan_group = group["id"].as_i64().unwrap();

    app.post(
        "/api/v1/ledgers",
        ledger_body("Cash in Hand", "1001", asset_sub, current_group, true),
    )
    .await;
    app.post(
        "/api/v1/ledgers",
        ledger_body("House Loan", "5001", liability_sub, loan_group, true),
    )
    .await;

    // Filter on the subcategory's category label (joined).
    let (status, body) = app.get("/api/v1/ledgers?category=liabilities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "House Loan");

    // Filter on the group category name (joined).
    let (_, body) = app.get("/api/v1/ledgers?group=long+term").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["code"], "5001");

    // Creation date range: a window around now matches, the past does not.
    let (_, body) = app
        .get("/api/v1/ledgers?created_from=2000-01-01&created_to=2100-01-01")
        .await;
    assert_eq!(body["count"], 2);
    let (_, body) = app.get("/api/v1/ledgers?created_to=2000-01-02").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn combined_filters_return_a_subset_matching_every_predicate() {
    let app = TestApp::spawn().await;
    let (sub, group) = setup_categories(&app).await;

    let fixtures = [
        ("Cash in Hand", "1001", true),
        ("Cash Reserve", "1002", false),
        ("Bank Asia", "2001", true),
        ("Bank Al-Falah", "2002", true),
        ("Old Cash Box", "3001", false),
    ];
    for (name, code, active) in fixtures {
        let (status, _) = app
            .post(
                "/api/v1/ledgers",
                ledger_body(name, code, sub, group, active),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = app.get("/api/v1/ledgers").await;
    let all_ids: Vec<i64> = all["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(all_ids.len(), fixtures.len());

    let (status, body) = app
        .get("/api/v1/ledgers?search=cash&is_active=true")
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["results"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    for row in rows {
        assert!(all_ids.contains(&row["id"].as_i64().unwrap()));
        assert_eq!(row["is_active"], true);
        let name = row["name"].as_str().unwrap().to_lowercase();
        let code = row["code"].as_str().unwrap().to_lowercase();
        let description = row["description"].as_str().unwrap_or("").to_lowercase();
        assert!(
            name.contains("cash") || code.contains("cash") || description.contains("cash")
        );
    }
    assert_eq!(rows[0]["name"], "Cash in Hand");
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request_unauthenticated(Method::GET, "/api/v1/ledgers", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage token is also rejected.
    let broken = TestApp {
        token: "not-a-jwt".to_string(),
        ..app
    };
    let (status, _) = broken.get("/api/v1/ledgers").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
