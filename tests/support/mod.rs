//! Fake product backend shared by the integration tests.
//!
//! Behaves like the real remote: writes answer 2xx and echo the request, but
//! nothing is persisted, so the next listing shows the seed again.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use catalog_overlay::ids::{IdGenerator, SequentialIds};
use catalog_overlay::model::{Product, Rating};
use catalog_overlay::remote::HttpCatalogClient;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Id the fake assigns to every created product, like the real backend does.
pub const ECHOED_ID: u64 = 21;
pub const LOCAL_IDS: u64 = 1_000;

pub struct FakeState {
    seed: Vec<Product>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Answer writes with an empty 200 body.
    pub empty_echo: AtomicBool,
    requests: Mutex<Vec<String>>,
}

impl FakeState {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.fail_reads.store(offline, Ordering::SeqCst);
        self.fail_writes.store(offline, Ordering::SeqCst);
    }

    fn find(&self, id: u64) -> Option<&Product> {
        self.seed.iter().find(|p| p.id.0 == id)
    }

    fn write_response(&self, echo: Value) -> Response {
        if self.fail_writes.load(Ordering::SeqCst) {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        if self.empty_echo.load(Ordering::SeqCst) {
            return StatusCode::OK.into_response();
        }
        Json(echo).into_response()
    }
}

pub struct FakeStore {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

impl FakeStore {
    pub async fn spawn(seed: Vec<Product>) -> Self {
        let state = Arc::new(FakeState {
            seed,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            empty_echo: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/:id",
                get(get_product).put(update_product).delete(delete_product),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/products"),
            state,
        }
    }

    pub fn client(&self) -> HttpCatalogClient {
        client_for(&self.base_url, local_ids())
    }
}

pub fn local_ids() -> Arc<dyn IdGenerator> {
    Arc::new(SequentialIds::starting_at(LOCAL_IDS))
}

pub fn client_for(base_url: &str, ids: Arc<dyn IdGenerator>) -> HttpCatalogClient {
    HttpCatalogClient::new(base_url, Duration::from_secs(5), ids).unwrap()
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/products")
}

/// Three rated products, ids 1..=3.
pub fn seed() -> Vec<Product> {
    vec![
        Product::new(1, "Backpack", 109.95).with_rating(Rating { rate: 3.9, count: 120 }),
        Product::new(2, "T-Shirt", 22.3).with_rating(Rating { rate: 4.1, count: 259 }),
        Product::new(3, "Jacket", 55.99).with_rating(Rating { rate: 4.7, count: 500 }),
    ]
}

async fn list_products(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /products".into());
    if state.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(state.seed.clone()).into_response()
}

async fn get_product(State(state): State<Arc<FakeState>>, Path(id): Path<u64>) -> Response {
    state.record(format!("GET /products/{id}"));
    if state.fail_reads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match state.find(id) {
        Some(product) => Json(product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_product(
    State(state): State<Arc<FakeState>>,
    Json(mut body): Json<Value>,
) -> Response {
    state.record("POST /products".into());
    body["id"] = json!(ECHOED_ID);
    state.write_response(body)
}

async fn update_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Response {
    state.record(format!("PUT /products/{id}"));
    if state.find(id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    body["id"] = json!(id);
    state.write_response(body)
}

async fn delete_product(State(state): State<Arc<FakeState>>, Path(id): Path<u64>) -> Response {
    state.record(format!("DELETE /products/{id}"));
    match state.find(id) {
        Some(product) => {
            let echo = serde_json::to_value(product).unwrap();
            state.write_response(echo)
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
