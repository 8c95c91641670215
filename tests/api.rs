use std::str::FromStr;

use axum::http::StatusCode;
use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;
use serde_json::{Value, json};
use time::Duration;

use finance_manager::{
    AppState, NewUser, PasswordHash, Role, ValidatedPassword, build_router, create_user,
    endpoints::{self, format_endpoint},
    initialize_db,
};

const PASSWORD: &str = "correct horse battery staple";
const HASH_COST: u32 = 4;

fn build_server() -> TestServer {
    let connection = Connection::open_in_memory().unwrap();
    initialize_db(&connection).unwrap();
    create_user(
        NewUser {
            username: "Admin".to_owned(),
            email: EmailAddress::from_str("admin@example.com").unwrap(),
            password_hash: PasswordHash::new(ValidatedPassword::new_unchecked(PASSWORD), HASH_COST)
                .unwrap(),
            role: Role::Admin,
        },
        &connection,
    )
    .unwrap();

    let state = AppState::new(connection, "integration test secret", Duration::hours(1))
        .unwrap()
        .with_password_hash_cost(HASH_COST);

    TestServer::new(build_router(state))
}

async fn register(server: &TestServer, username: &str, email: &str) -> Value {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({"username": username, "email": email, "password": PASSWORD}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn log_in(server: &TestServer, email: &str) -> String {
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": email, "password": PASSWORD}))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["token_type"], "Bearer");
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn register_log_in_and_track_spending() {
    let server = build_server();
    let user = register(&server, "Jorge", "jorge@gmail.com").await;
    assert_eq!(user["role"], "USER");
    assert!(user.get("password").is_none());
    let token = log_in(&server, "jorge@gmail.com").await;

    let me = server
        .get(endpoints::CURRENT_USER)
        .authorization_bearer(&token)
        .await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["email"], "jorge@gmail.com");

    server
        .post(endpoints::CATEGORIES)
        .authorization_bearer(&token)
        .json(&json!({"name": "Alimentacao", "kind": "EXPENSE"}))
        .await
        .assert_status(StatusCode::CREATED);

    for (date, category, amount) in [
        ("2024-01-10", "Alimentacao", "100.00"),
        ("2024-01-15", "Transporte", "20.50"),
        ("2024-02-03", "Alimentacao", "80"),
    ] {
        server
            .post(endpoints::EXPENSES)
            .authorization_bearer(&token)
            .json(&json!({"date": date, "category": category, "amount": amount}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let monthly = server
        .get(endpoints::EXPENSES_MONTHLY_CHART)
        .add_query_param("start", "2024-01")
        .add_query_param("end", "2024-02")
        .authorization_bearer(&token)
        .await;
    monthly.assert_status_ok();
    monthly.assert_json(&json!({
        "months": [
            {"period": "2024-01", "label": "January 2024", "total": "120.50"},
            {"period": "2024-02", "label": "February 2024", "total": "80"},
        ]
    }));

    let by_category = server
        .get(endpoints::EXPENSES_CATEGORY_CHART)
        .add_query_param("start", "2024-01-01")
        .add_query_param("end", "2024-02-29")
        .authorization_bearer(&token)
        .await;
    by_category.assert_status_ok();
    by_category.assert_json(&json!({
        "categories": {"Alimentacao": "180.00", "Transporte": "20.50"}
    }));

    let budget = server
        .post(endpoints::BUDGETS)
        .authorization_bearer(&token)
        .json(&json!({"category": "Alimentacao", "limit": "500", "period": "2024-01"}))
        .await;
    budget.assert_status(StatusCode::CREATED);
    let budget_id = budget.json::<Value>()["id"].as_i64().unwrap();

    server
        .post(endpoints::BUDGETS)
        .authorization_bearer(&token)
        .json(&json!({"category": "Alimentacao", "limit": "600", "period": "2024-01"}))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .get(&format_endpoint(endpoints::BUDGET, budget_id))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn users_cannot_see_each_others_data() {
    let server = build_server();
    register(&server, "Jorge", "jorge@gmail.com").await;
    register(&server, "Maria", "maria@gmail.com").await;
    let jorge = log_in(&server, "jorge@gmail.com").await;
    let maria = log_in(&server, "maria@gmail.com").await;

    let income = server
        .post(endpoints::INCOMES)
        .authorization_bearer(&jorge)
        .json(&json!({
            "date": "2024-01-05",
            "category": "Salario",
            "amount": "5000",
            "source": "Empresa X",
        }))
        .await;
    income.assert_status(StatusCode::CREATED);
    let income_path = format_endpoint(endpoints::INCOME, income.json::<Value>()["id"].as_i64().unwrap());

    server
        .get(&income_path)
        .authorization_bearer(&maria)
        .await
        .assert_status_not_found();
    server
        .delete(&income_path)
        .authorization_bearer(&maria)
        .await
        .assert_status_not_found();

    let maria_incomes = server
        .get(endpoints::INCOMES)
        .authorization_bearer(&maria)
        .await;
    maria_incomes.assert_status_ok();
    maria_incomes.assert_json(&json!([]));
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let server = build_server();
    register(&server, "Jorge", "jorge@gmail.com").await;

    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({"username": "Jorge", "email": "JORGE@gmail.com", "password": PASSWORD}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let server = build_server();
    register(&server, "Jorge", "jorge@gmail.com").await;

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": "jorge@gmail.com", "password": "not the password"}))
        .await;

    response.assert_status_unauthorized();
    response.assert_json(&json!({"error": "invalid email or password"}));
}

#[tokio::test]
async fn only_admins_can_manage_users() {
    let server = build_server();
    let user = register(&server, "Jorge", "jorge@gmail.com").await;
    let user_token = log_in(&server, "jorge@gmail.com").await;
    let admin_token = log_in(&server, "admin@example.com").await;

    server
        .get(endpoints::ADMIN_USERS)
        .authorization_bearer(&user_token)
        .await
        .assert_status_forbidden();

    let users = server
        .get(endpoints::ADMIN_USERS)
        .authorization_bearer(&admin_token)
        .await;
    users.assert_status_ok();
    assert_eq!(users.json::<Vec<Value>>().len(), 2);

    let user_path = format_endpoint(endpoints::ADMIN_USER, user["id"].as_i64().unwrap());
    server
        .delete(&user_path)
        .authorization_bearer(&admin_token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The token outlives the user, but the user no longer exists.
    server
        .get(endpoints::CURRENT_USER)
        .authorization_bearer(&user_token)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn deleting_account_removes_access() {
    let server = build_server();
    register(&server, "Jorge", "jorge@gmail.com").await;
    let token = log_in(&server, "jorge@gmail.com").await;

    server
        .delete(endpoints::CURRENT_USER)
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": "jorge@gmail.com", "password": PASSWORD}))
        .await
        .assert_status_unauthorized();
}
