// 测试用的进程内 REST 后端
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use devhub::{
    AppState,
    config::Config,
    storage::{LocalStorage, MemoryStorage},
};
use serde::Deserialize;
use serde_json::{Value, json};

pub const ACCESS_TOKEN: &str = "tok-1";

#[derive(Default)]
pub struct Recorder {
    hits: AtomicUsize,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// (路径, Authorization 头)
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.requests().last().and_then(|(_, auth)| auth.clone())
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub recorder: Arc<Recorder>,
}

pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
    pub backend: FakeBackend,
}

/// 启动假后端并构造指向它的应用状态（非演示模式）
pub async fn spawn_app() -> TestApp {
    spawn_app_with(false).await
}

pub async fn spawn_demo_app() -> TestApp {
    spawn_app_with(true).await
}

async fn spawn_app_with(demo_mode: bool) -> TestApp {
    let backend = spawn_backend().await;
    let storage = Arc::new(MemoryStorage::new());
    let config = Config {
        api_base_url: backend.base_url.clone(),
        demo_mode,
        ..Config::default()
    };
    let state = AppState::new(config, storage.clone() as Arc<dyn LocalStorage>);
    TestApp {
        state,
        storage,
        backend,
    }
}

pub async fn spawn_backend() -> FakeBackend {
    let recorder = Arc::new(Recorder::default());

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/auth/me", get(me))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/chat/rooms", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/users/search", get(search_users))
        .route("/gemini/explain", post(explain))
        .route("/gemini/fix-bug", post(fix_bug))
        .route("/gemini/generate-code", post(generate_code))
        .route("/gemini/review-resume", post(review_resume))
        .layer(axum::middleware::from_fn_with_state(recorder.clone(), record));

    let app = Router::new().nest("/api", api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        base_url: format!("http://{}/api", addr),
        recorder,
    }
}

// 嵌套路由内看到的 URI 已去掉 `/api` 前缀，这里记录完整路径
async fn record(
    State(recorder): State<Arc<Recorder>>,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    let auth = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorder
        .requests
        .lock()
        .unwrap()
        .push((uri.path().to_string(), auth));
    next.run(request).await
}

fn user_json() -> Value {
    json!({
        "_id": "u-1",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "username": "ada",
        "role": "user"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "wrong-password" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "data": {
            "user": user_json(),
            "accessToken": ACCESS_TOKEN,
            "refreshToken": "ref-1"
        }
    }))
    .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {}", ACCESS_TOKEN);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Json(json!({ "success": true, "data": user_json() }))
            .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

#[derive(Deserialize)]
struct PostQuery {
    search: Option<String>,
}

async fn list_posts(Query(query): Query<PostQuery>) -> Json<Value> {
    let posts = json!([
        { "_id": "p-1", "title": "Ownership in Rust", "content": "Borrowing explained", "tags": ["rust"] },
        { "_id": "p-2", "title": "Async Python", "content": "asyncio basics", "tags": ["python"] }
    ]);
    let posts: Vec<Value> = posts
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| match &query.search {
            Some(term) => p["title"].as_str().unwrap().to_lowercase().contains(&term.to_lowercase()),
            None => true,
        })
        .cloned()
        .collect();
    Json(json!({ "success": true, "data": posts }))
}

async fn create_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut post = body.clone();
    post["_id"] = json!("p-new");
    (StatusCode::CREATED, Json(json!({ "success": true, "data": post })))
}

async fn get_post(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Post not found" }))).into_response();
    }
    Json(json!({ "_id": id, "title": "Bare post" })).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search_users(Query(query): Query<SearchQuery>) -> Json<Value> {
    Json(json!([{ "_id": "u-1", "name": "Ada Lovelace", "username": query.q }]))
}

async fn explain() -> Json<Value> {
    Json(json!({
        "choices": [{
            "message": { "content": "This function sums a slice.\nTime Complexity: O(n)" }
        }]
    }))
}

async fn fix_bug() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": "The range skips the last element.\n\n```rust\nfor i in 0..=n {}\n```"
    }))
}

async fn generate_code() -> &'static str {
    "Here you go:\n\n```python\nprint('hi')\n```\n\nRun it with python3."
}

async fn review_resume() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "explanation": "Solid resume overall.",
            "suggestions": ["Quantify impact"],
            "improvements": ["Shorten the summary"]
        }
    }))
}
