use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use stockroom_api::app::{AppServices, build_router};
use stockroom_inventory::ServiceConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, over in-memory stores, on an ephemeral port.
        let services = Arc::new(AppServices::in_memory(ServiceConfig::default()));
        let app = build_router(services, Duration::from_secs(5));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn create(&self, path: &str, body: Value) -> i64 {
        let res = self.post(path, body).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = res.json().await.unwrap();
        created["id"].as_i64().unwrap()
    }

    /// One brand, one category, and an article per `(name, quantity)`.
    async fn seed(&self, articles: &[(&str, i32)]) -> (i64, i64, Vec<i64>) {
        let brand = self
            .create("/brands", json!({ "name": "Acme", "description": "tools" }))
            .await;
        let category = self
            .create("/categories", json!({ "name": "Hardware", "description": "metal" }))
            .await;
        let mut ids = Vec::new();
        for (name, quantity) in articles {
            let id = self
                .create(
                    "/articles",
                    json!({
                        "name": name,
                        "description": "item",
                        "quantity": quantity,
                        "price": "19.99",
                        "brand_id": brand,
                        "category_ids": [category],
                    }),
                )
                .await;
            ids.push(id);
        }
        (brand, category, ids)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn article_lifecycle_create_reduce_query() {
    let srv = TestServer::spawn().await;
    let (brand, _, ids) = srv.seed(&[("Hammer", 10)]).await;
    let id = ids[0];

    let res = srv.get(&format!("/articles/{id}/detail")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = res.json().await.unwrap();
    assert_eq!(detail["name"], "Hammer");
    assert_eq!(detail["brand"]["id"].as_i64().unwrap(), brand);
    assert_eq!(detail["categories"][0]["name"], "Hardware");

    let res = srv
        .post(&format!("/articles/{id}/reduce"), json!({ "quantity": 4 }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let reduced: Value = res.json().await.unwrap();
    assert_eq!(reduced["quantity"], 6);

    let res = srv
        .post(&format!("/articles/{id}/reduce"), json!({ "quantity": 7 }))
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "insufficient_stock");

    let res = srv.get(&format!("/articles/{id}/availability/6")).await;
    assert_eq!(res.json::<bool>().await.unwrap(), true);
    let res = srv.get(&format!("/articles/{id}/availability/7")).await;
    assert_eq!(res.json::<bool>().await.unwrap(), false);

    let res = srv.get(&format!("/articles/{id}")).await;
    assert_eq!(res.json::<bool>().await.unwrap(), true);
    let res = srv.get("/articles/999").await;
    assert_eq!(res.json::<bool>().await.unwrap(), false);
}

#[tokio::test]
async fn price_is_returned_exactly() {
    let srv = TestServer::spawn().await;
    let (_, _, ids) = srv.seed(&[("Saw", 1)]).await;

    let res = srv.get(&format!("/articles/{}/price", ids[0])).await;
    assert_eq!(res.status(), StatusCode::OK);
    let price: Value = res.json().await.unwrap();
    assert_eq!(price, json!("19.99"));
}

#[tokio::test]
async fn duplicate_brand_name_is_a_conflict() {
    let srv = TestServer::spawn().await;
    srv.create("/brands", json!({ "name": "Acme", "description": "a" }))
        .await;

    let res = srv
        .post("/brands", json!({ "name": "Acme", "description": "b" }))
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "name_conflict");

    let page: Value = srv.get("/brands").await.json().await.unwrap();
    assert_eq!(page["total_elements"], 1);
}

#[tokio::test]
async fn article_with_unknown_brand_is_not_found() {
    let srv = TestServer::spawn().await;
    let category = srv
        .create("/categories", json!({ "name": "Hardware", "description": "metal" }))
        .await;

    let res = srv
        .post(
            "/articles",
            json!({
                "name": "Orphan",
                "description": "none",
                "quantity": 1,
                "price": 5,
                "brand_id": 42,
                "category_ids": [category],
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(res).await, "not_found");
}

#[tokio::test]
async fn listing_pages_through_articles_by_name() {
    let srv = TestServer::spawn().await;
    srv.seed(&[("E", 1), ("C", 1), ("A", 1), ("D", 1), ("B", 1)])
        .await;

    let first: Value = srv
        .get("/articles?page=0&size=2&sort=name&ascending=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["total_elements"], 5);
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["number_of_elements"], 2);
    assert_eq!(first["content"][0]["name"], "A");
    assert_eq!(first["content"][1]["name"], "B");

    let last: Value = srv
        .get("/articles?page=2&size=2&sort=name")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(last["number_of_elements"], 1);
    assert_eq!(last["content"][0]["name"], "E");

    let beyond: Value = srv.get("/articles?page=9&size=2").await.json().await.unwrap();
    assert_eq!(beyond["content"].as_array().unwrap().len(), 0);
    assert_eq!(beyond["total_elements"], 5);
}

#[tokio::test]
async fn listing_applies_display_order() {
    let srv = TestServer::spawn().await;
    let brand = srv
        .create("/brands", json!({ "name": "Acme", "description": "tools" }))
        .await;
    let mut category = std::collections::HashMap::new();
    for name in ["Audio", "Phones", "Tablets"] {
        let id = srv
            .create("/categories", json!({ "name": name, "description": "c" }))
            .await;
        category.insert(name, id);
    }
    for (name, categories) in [
        ("A1", vec!["Phones"]),
        ("B1", vec!["Tablets", "Audio"]),
        ("C1", vec!["Audio"]),
    ] {
        let ids: Vec<i64> = categories.iter().map(|c| category[c]).collect();
        srv.create(
            "/articles",
            json!({
                "name": name,
                "description": "item",
                "quantity": 1,
                "price": 3,
                "brand_id": brand,
                "category_ids": ids,
            }),
        )
        .await;
    }

    let page: Value = srv.get("/articles?sort=name").await.json().await.unwrap();
    let order: Vec<&str> = page["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    // (first category name, category count) after sorting each article's categories
    assert_eq!(order, vec!["C1", "B1", "A1"]);
    assert_eq!(page["content"][1]["categories"][0]["name"], "Audio");
    assert_eq!(page["content"][1]["categories"][1]["name"], "Tablets");

    let detail: Value = srv
        .get(&format!("/articles/{}/detail", page["content"][1]["id"]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["categories"][0]["name"], "Tablets");
}

#[tokio::test]
async fn search_filters_by_brand_and_ids() {
    let srv = TestServer::spawn().await;
    let (_, _, ids) = srv.seed(&[("Hammer", 1), ("Wrench", 1)]).await;
    let other = srv
        .create("/brands", json!({ "name": "Bolt", "description": "b" }))
        .await;
    let category = srv
        .create("/categories", json!({ "name": "Garden", "description": "g" }))
        .await;
    srv.create(
        "/articles",
        json!({
            "name": "Rake",
            "description": "leaves",
            "quantity": 3,
            "price": "9.50",
            "brand_id": other,
            "category_ids": [category],
        }),
    )
    .await;

    let by_brand: Value = srv
        .post("/articles/search", json!({ "brand_name": "Acme" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(by_brand["total_elements"], 2);

    let by_ids: Value = srv
        .post(
            "/articles/search",
            json!({ "brand_name": "Acme", "article_ids": [ids[1]] }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(by_ids["total_elements"], 1);
    assert_eq!(by_ids["content"][0]["name"], "Wrench");

    let none: Value = srv
        .post("/articles/search", json!({ "category_name": "Nowhere" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(none["total_elements"], 0);

    let names: Vec<String> = srv
        .get(&format!("/categories/by-article/{}", ids[0]))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names, vec!["Hardware".to_string()]);
}

#[tokio::test]
async fn bad_inputs_are_rejected() {
    let srv = TestServer::spawn().await;
    let (brand, category, ids) = srv.seed(&[("Hammer", 2)]).await;

    let res = srv
        .post(
            "/articles",
            json!({
                "name": "Twice",
                "description": "item",
                "quantity": 1,
                "price": 2,
                "brand_id": brand,
                "category_ids": [category, category],
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "validation_error");

    let res = srv.get(&format!("/articles/{}/availability/-1", ids[0])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.get("/articles/not-a-number/detail").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "invalid_id");

    let res = srv.get("/articles?sort=colour").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "validation_error");

    let res = srv.get("/brands?size=1000").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .patch(srv.url(&format!("/articles/{}/quantity", ids[0])))
        .json(&json!({ "quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(res).await, "invariant_violation");

    let res = srv.get("/brands/77").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_lookup_skips_missing_ids() {
    let srv = TestServer::spawn().await;
    let (_, _, ids) = srv.seed(&[("Hammer", 1), ("Wrench", 1)]).await;

    let found: Vec<Value> = srv
        .post(
            "/articles/by-ids",
            json!({ "article_ids": [ids[1], 999, ids[0]] }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}
