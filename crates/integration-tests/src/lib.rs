//! Integration tests for Tee Storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tee-storefront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `product_api` - `HttpProductSource` against a stub product endpoint
//! - `page_flow` - Page loads over a file store, across "page reloads"
//!
//! The stub endpoint is a real axum server on an ephemeral local port, so
//! requests go through reqwest exactly as they do against the live API.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tee_storefront::config::ProductApiConfig;
use tee_storefront::view::{NoticeKind, Notifier, ViewRenderer};
use tee_storefront_core::{CartSnapshot, ProductRecord, Size, SizeOption};

/// Payload the live endpoint returns for the tee.
pub const SAMPLE_PRODUCT_JSON: &str = r#"{
    "imageURL": "https://cdn.example.com/classic-tee.jpg",
    "title": "Classic Tee",
    "description": "Heavyweight cotton, relaxed fit.",
    "price": 75.0,
    "sizeOptions": [{"label": "S"}, {"label": "M"}, {"label": "L"}]
}"#;

#[derive(Debug)]
struct StubState {
    response: Mutex<(StatusCode, String)>,
    hits: AtomicUsize,
}

/// Stub product endpoint serving `GET /live/product`.
///
/// Counts requests. The response can be swapped between requests.
#[derive(Debug, Clone)]
pub struct StubProductApi {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubProductApi {
    /// Start the stub on `127.0.0.1` answering with `status` and `body`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let state = Arc::new(StubState {
            response: Mutex::new((to_status(status), body.into())),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/live/product", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub product endpoint");
        let addr = listener
            .local_addr()
            .expect("Stub listener has no local address");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Stub product endpoint stopped");
            }
        });

        Self { addr, state }
    }

    /// Start the stub serving [`SAMPLE_PRODUCT_JSON`].
    pub async fn serving_sample() -> Self {
        Self::start(200, SAMPLE_PRODUCT_JSON).await
    }

    /// Change the response for subsequent requests.
    pub fn respond_with(&self, status: u16, body: impl Into<String>) {
        *self
            .state
            .response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = (to_status(status), body.into());
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Endpoint configuration pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the stub address does not form a valid URL.
    #[must_use]
    pub fn config(&self) -> ProductApiConfig {
        ProductApiConfig {
            url: format!("http://{}/live/product", self.addr)
                .parse()
                .expect("Stub URL is valid"),
        }
    }
}

async fn product(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let (status, body) = state
        .response
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

fn to_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// What a [`RecordingView`] was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Product(String),
    Sizes {
        labels: Vec<String>,
        selected: Option<String>,
    },
    Cart(CartSnapshot),
    Dropdown(bool),
    Notice(NoticeKind),
}

/// View that records every render call.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub rendered: Vec<Rendered>,
}

impl RecordingView {
    /// Notices shown so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<NoticeKind> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Notice(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// The most recent cart render.
    #[must_use]
    pub fn last_cart(&self) -> Option<&CartSnapshot> {
        self.rendered.iter().rev().find_map(|r| match r {
            Rendered::Cart(snapshot) => Some(snapshot),
            _ => None,
        })
    }
}

impl Notifier for RecordingView {
    fn notify(&mut self, kind: NoticeKind, _message: &str) {
        self.rendered.push(Rendered::Notice(kind));
    }
}

impl ViewRenderer for RecordingView {
    fn display_product(&mut self, product: &ProductRecord) {
        self.rendered.push(Rendered::Product(product.title.clone()));
    }

    fn display_size_options(&mut self, options: &[SizeOption], selected: Option<&Size>) {
        self.rendered.push(Rendered::Sizes {
            labels: options.iter().map(|o| o.label.clone()).collect(),
            selected: selected.map(ToString::to_string),
        });
    }

    fn display_cart(&mut self, snapshot: &CartSnapshot) {
        self.rendered.push(Rendered::Cart(snapshot.clone()));
    }

    fn set_cart_dropdown_visible(&mut self, visible: bool) {
        self.rendered.push(Rendered::Dropdown(visible));
    }
}
