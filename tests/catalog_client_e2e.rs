use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use catalog::{
    client::{CatalogClient, FetchError, ALL_CATEGORIES},
    config::Config,
    error::Result,
    models::{
        product::{Price, ProductInput},
        session::Session,
    },
    repositories::{memory::InMemoryProductRepository, session::SessionStore},
    routes,
    state::AppState,
};

struct Anonymous;

#[async_trait]
impl SessionStore for Anonymous {
    async fn load(&self, _token: &str) -> Result<Option<Session>> {
        Ok(None)
    }

    async fn remove(&self, _token: &str) -> Result<()> {
        Ok(())
    }
}

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
    products: Arc<InMemoryProductRepository>,
}

impl TestContext {
    async fn start() -> Self {
        let products = Arc::new(InMemoryProductRepository::new());
        let state = AppState::with_parts(Config::default(), products.clone(), Arc::new(Anonymous));
        let app = routes::router(state);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{}", addr),
            products,
        }
    }

    fn catalog(&self) -> CatalogClient {
        CatalogClient::with_http(self.client.clone(), self.base_url.clone())
    }
}

fn input(name: &str, description: &str, category: &str) -> ProductInput {
    ProductInput {
        product_name: name.to_string(),
        description: description.to_string(),
        price: Price::Integer(49),
        category: Some(category.to_string()),
        features: vec!["Realtime".to_string()],
        in_stock: true,
        product_image: None,
    }
}

#[tokio::test]
async fn dashboard_submission_shows_up_in_list_and_detail() {
    let context = TestContext::start().await;
    let catalog = context.catalog();

    let acme = input("Acme CRM", "Customer tracking for small teams", "CRM");
    let id = catalog.create_product(&acme).await.unwrap();

    let detail = catalog.product(&id.to_string()).await;
    assert!(detail.is_success());
    let product = detail.data().unwrap();
    assert_eq!(product.id, id);
    assert_eq!(product.input(), acme);

    let list = catalog.products().await;
    assert_eq!(list.data().unwrap().len(), 1);
}

#[tokio::test]
async fn list_is_fetched_once_per_client() {
    let context = TestContext::start().await;
    let catalog = context.catalog();
    catalog.create_product(&input("DataViz", "Charts", "Analytics")).await.unwrap();
    let queries_after_create = context.products.query_count();

    let (a, b) = tokio::join!(catalog.products(), catalog.products());
    assert_eq!(a.data().unwrap().len(), 1);
    assert_eq!(b.data().unwrap().len(), 1);

    let again = catalog.products().await;
    assert_eq!(again.data().unwrap().len(), 1);
    assert_eq!(context.products.query_count(), queries_after_create + 1);
}

#[tokio::test]
async fn filtering_runs_over_the_cached_list() {
    let context = TestContext::start().await;
    let catalog = context.catalog();
    catalog.create_product(&input("Acme CRM", "Customer tracking", "CRM")).await.unwrap();
    catalog.create_product(&input("DataViz", "Charts and dashboards", "Analytics")).await.unwrap();

    let acme = catalog.filtered_products("acme", ALL_CATEGORIES).await;
    let names: Vec<_> = acme.data().unwrap().iter().map(|p| p.product_name.clone()).collect();
    assert_eq!(names, ["Acme CRM"]);

    let queries = context.products.query_count();
    let analytics = catalog.filtered_products("", "Analytics").await;
    assert_eq!(analytics.data().unwrap()[0].product_name, "DataViz");
    let none = catalog.filtered_products("zzz", ALL_CATEGORIES).await;
    assert!(none.data().unwrap().is_empty());
    assert_eq!(context.products.query_count(), queries);
}

#[tokio::test]
async fn missing_and_malformed_ids_surface_as_errors() {
    let context = TestContext::start().await;
    let catalog = context.catalog();

    let missing = catalog.product("65a1f0c2b3d4e5f601234567").await;
    assert!(missing.is_error());
    assert!(matches!(
        missing.error(),
        Some(FetchError::Status { status: 404, .. })
    ));

    let malformed = catalog.product("not-an-id").await;
    assert!(matches!(
        malformed.error(),
        Some(FetchError::Status { status: 400, .. })
    ));
}

#[tokio::test]
async fn ids_stay_inside_their_path_segment() {
    let context = TestContext::start().await;
    let catalog = context.catalog();
    catalog.create_product(&input("DataViz", "Charts", "Analytics")).await.unwrap();

    for id in ["", "a/b", "x?y=1"] {
        let state = catalog.product(id).await;
        assert!(
            matches!(state.error(), Some(FetchError::Status { status: 400, .. })),
            "id {id:?} gave {state:?}"
        );
    }
    assert_eq!(context.products.query_count(), 1);
}

#[tokio::test]
async fn unreachable_server_is_an_error_state() {
    let catalog = CatalogClient::new("http://127.0.0.1:1").unwrap();
    let state = catalog.products().await;
    assert!(state.is_error());
    assert!(matches!(state.error(), Some(FetchError::Transport(_))));
    assert!(catalog.products_state().await.is_error());
}

#[tokio::test]
async fn raw_http_contract() {
    let context = TestContext::start().await;

    let created = context
        .client
        .post(format!("{}/api/products", context.base_url))
        .json(&json!({
            "productName": "Vault",
            "description": "Encrypted storage",
            "price": "12.50",
            "category": "Storage",
            "features": [],
            "inStock": false,
            "productImage": "",
            "createdAt": "1999-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);
    let body: Value = created.json().await.unwrap();
    assert_eq!(body["message"], "Product added");
    let id = body["id"].as_str().unwrap().to_string();

    let fetched: Value = context
        .client
        .get(format!("{}/api/products/{}", context.base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["price"], "12.50");
    assert_eq!(fetched["inStock"], false);
    assert_eq!(fetched["productImage"], "");
    assert_ne!(fetched["createdAt"], "1999-01-01T00:00:00Z");

    let bad = context
        .client
        .get(format!("{}/api/products/not-an-id", context.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status().as_u16(), 400);

    let missing = context
        .client
        .get(format!("{}/api/products/000000000000000000000000", context.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let missing_body: Value = missing.json().await.unwrap();
    assert!(missing_body["message"].is_string());

    let malformed = context
        .client
        .post(format!("{}/api/products", context.base_url))
        .body("{\"productName\":")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 500);

    let session: Value = context
        .client
        .get(format!("{}/api/auth/session", context.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session, Value::Null);
}
