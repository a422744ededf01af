//! Integration test support for the ShopMall store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopmall-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_ledger` - cart totals across arbitrary mutation sequences
//! - `catalog_coordinator` - fetch lifecycle, fallback and completion races
//! - `session_bridge` - credential operations against provider pushes
//! - `checkout_flow` - end-to-end browse, sign in and checkout
//! - `http_catalog` - the HTTP client against a local axum mock service
//!
//! Nothing here touches the network beyond `127.0.0.1`.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use secrecy::SecretString;
use shopmall_core::{Email, Identity, Price, Product, ProductId, Rating};
use shopmall_store::{AuthError, CatalogConfig, CatalogError, CatalogSource, IdentityProvider};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

// =============================================================================
// Fixtures
// =============================================================================

/// Build a product with the fields the store cares about.
#[must_use]
pub fn product(id: i32, title: &str, cents: u32, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Price::from_cents(cents),
        description: String::new(),
        category: category.to_string(),
        image: format!("https://img.example/{id}.png"),
        rating: Rating::default(),
    }
}

/// Build an identity signed in now.
///
/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
pub fn identity(uid: &str, email: &str) -> Identity {
    match Email::parse(email) {
        Ok(email) => Identity::new(uid, email, Utc::now()),
        Err(e) => panic!("fixture email {email:?} is invalid: {e}"),
    }
}

/// Yield to the runtime until `condition` holds.
///
/// # Panics
///
/// Panics if the condition is still false after a thousand yields.
pub async fn settle<F: Fn() -> bool>(condition: F) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    assert!(condition(), "condition never became true");
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Gated catalog source
// =============================================================================

/// Sender that settles one pending fetch.
pub type Gate<T> = oneshot::Sender<Result<T, CatalogError>>;

/// Catalog source whose fetches wait until the test releases them.
///
/// Each [`GatedSource::gate_products`] call scripts one future
/// `fetch_products` call; calls pick their gate in the order they start,
/// so the test decides the order in which they complete.
#[derive(Default)]
pub struct GatedSource {
    products: Mutex<VecDeque<oneshot::Receiver<Result<Vec<Product>, CatalogError>>>>,
    categories: Mutex<VecDeque<oneshot::Receiver<Result<Vec<String>, CatalogError>>>>,
    details: Mutex<HashMap<ProductId, Product>>,
}

impl GatedSource {
    /// Create a source with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next product list fetch.
    pub fn gate_products(&self) -> Gate<Vec<Product>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.products).push_back(rx);
        tx
    }

    /// Script the next category fetch.
    pub fn gate_categories(&self) -> Gate<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.categories).push_back(rx);
        tx
    }

    /// Make a product available to `fetch_product`.
    pub fn insert_detail(&self, product: Product) {
        lock(&self.details).insert(product.id, product);
    }
}

async fn wait_for<T>(
    gate: Option<oneshot::Receiver<Result<T, CatalogError>>>,
) -> Result<T, CatalogError> {
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(CatalogError::Unavailable("gate dropped".to_string()))),
        None => Err(CatalogError::Unavailable("no response scripted".to_string())),
    }
}

impl CatalogSource for GatedSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let gate = lock(&self.products).pop_front();
        wait_for(gate).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        let gate = lock(&self.categories).pop_front();
        wait_for(gate).await
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        lock(&self.details)
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}

// =============================================================================
// Gated identity provider
// =============================================================================

type CredentialGate = oneshot::Receiver<Result<Identity, AuthError>>;

/// Identity provider whose sign-ins and sign-ups wait for the test.
///
/// Sign-in and sign-up share one queue of gates, taken in the order the
/// calls start. Sign-out always succeeds and pushes `None`.
pub struct GatedProvider {
    credentials: Mutex<VecDeque<CredentialGate>>,
    current: watch::Sender<Option<Identity>>,
}

impl Default for GatedProvider {
    fn default() -> Self {
        Self {
            credentials: Mutex::new(VecDeque::new()),
            current: watch::Sender::new(None),
        }
    }
}

impl GatedProvider {
    /// Create a provider with nothing scripted and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next credential operation.
    pub fn gate(&self) -> oneshot::Sender<Result<Identity, AuthError>> {
        let (tx, rx) = oneshot::channel();
        lock(&self.credentials).push_back(rx);
        tx
    }

    async fn next_credential(&self) -> Result<Identity, AuthError> {
        let gate = lock(&self.credentials).pop_front();
        let result = match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(AuthError::Unavailable("gate dropped".to_string()))),
            None => Err(AuthError::Unavailable("no response scripted".to_string())),
        };
        if let Ok(identity) = &result {
            self.current.send_replace(Some(identity.clone()));
        }
        result
    }
}

impl IdentityProvider for GatedProvider {
    async fn sign_in(
        &self,
        _email: &Email,
        _password: &SecretString,
    ) -> Result<Identity, AuthError> {
        self.next_credential().await
    }

    async fn sign_up(
        &self,
        _email: &Email,
        _password: &SecretString,
    ) -> Result<Identity, AuthError> {
        self.next_credential().await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.current.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

// =============================================================================
// Mock catalog service
// =============================================================================

type Routes = HashMap<String, (u16, String)>;

#[derive(Clone, Default)]
struct MockRoutes {
    routes: Arc<Mutex<Routes>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

/// Local HTTP service answering canned responses per path.
///
/// Unknown paths answer `404` with an empty body. Every request is counted
/// so tests can tell cached responses from fresh ones.
pub struct MockCatalogServer {
    addr: SocketAddr,
    state: MockRoutes,
    task: JoinHandle<io::Result<()>>,
}

impl MockCatalogServer {
    /// Bind to an ephemeral localhost port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = MockRoutes::default();

        let app = Router::new()
            .fallback(answer)
            .with_state(state.clone());
        let task = tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { addr, state, task })
    }

    /// Answer `path` with `status` and `body` from now on.
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        lock(&self.state.routes).insert(path.to_string(), (status, body.into()));
    }

    /// Answer `path` with `200` and `value` serialized as JSON.
    pub fn respond_json(&self, path: &str, value: &serde_json::Value) {
        self.respond(path, 200, value.to_string());
    }

    /// Number of requests received for `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        lock(&self.state.hits).get(path).copied().unwrap_or(0)
    }

    /// Base URL of the server.
    #[must_use]
    pub fn base_url(&self) -> url::Url {
        let mut url = url::Url::parse("http://127.0.0.1/")
            .unwrap_or_else(|e| panic!("static URL is invalid: {e}"));
        let _ = url.set_port(Some(self.addr.port()));
        url
    }

    /// Catalog configuration pointing at this server.
    #[must_use]
    pub fn config(&self, cache_ttl: Duration) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url(),
            request_timeout: Duration::from_secs(5),
            cache_ttl,
        }
    }
}

impl Drop for MockCatalogServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(State(state): State<MockRoutes>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *lock(&state.hits).entry(path.clone()).or_insert(0) += 1;

    let (status, body) = lock(&state.routes)
        .get(&path)
        .cloned()
        .unwrap_or((404, String::new()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
