#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::{self, queries::questions::create_question, IN_MEMORY};
use trivia_api::server::app::{router, AppState};
use trivia_api::settings::{DatabaseSettings, Settings};

pub const QUESTIONS: [(&str, &str, i64, i64); 12] = [
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    ("Which Dutch graphic artist made mathematically inspired prints?", "Escher", 2, 1),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
    ("Who invented Peanut Butter?", "George Washington Carver", 4, 2),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    ("What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 5, 4),
];

pub fn test_settings() -> Settings {
    let mut settings = Settings::defaults().expect("default settings should load");
    settings.database = DatabaseSettings {
        path: IN_MEMORY.to_owned(),
        max_connections: 1,
    };
    settings
}

pub async fn create_test_db(settings: &Settings) -> SqlitePool {
    let pool = db::establish_connection(&settings.database)
        .await
        .expect("failed to open test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

pub async fn seed_questions(pool: &SqlitePool) -> Vec<i64> {
    let mut ids = Vec::new();
    for (question, answer, category, difficulty) in QUESTIONS {
        let id = create_question(pool, question, answer, category, difficulty)
            .await
            .expect("seed question");
        ids.push(id);
    }
    ids
}

/// Router over a seeded in-memory database, plus the pool and seeded ids.
pub async fn app() -> (Router, SqlitePool, Vec<i64>) {
    app_with(test_settings()).await
}

pub async fn app_with(settings: Settings) -> (Router, SqlitePool, Vec<i64>) {
    let pool = create_test_db(&settings).await;
    let ids = seed_questions(&pool).await;
    let app = router(AppState::new(pool.clone(), settings));
    (app, pool, ids)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request build should succeed");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("router should respond");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn assert_error(status: StatusCode, body: &Value, code: u16, message: &str) {
    assert_eq!(status.as_u16(), code, "unexpected status, body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
    assert_eq!(body["message"], message);
}
