use chrono::{TimeZone, Utc};
use gestock_client::storage::TOKEN_KEY;
use gestock_client::{ApiClient, AppStore, ClientConfig, ClientError, SessionStorage};
use gestock_core::{CoreError, Money, NewProduct, NewPurchase, NewSale, OrderStatus};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> AppStore {
    let storage = SessionStorage::in_memory();
    storage.set_item(TOKEN_KEY, "abc").unwrap();
    let api = ApiClient::new(&ClientConfig::with_base_url(server.uri()), storage).unwrap();
    AppStore::new(api)
}

fn product_json(id: i64, nom: &str, stock: i64) -> Value {
    json!({
        "id": id,
        "nom": nom,
        "categorie": "Alimentaire",
        "prix_achat": 4000,
        "prix_vente": 5200,
        "stock": stock,
        "seuil_alerte": 10
    })
}

fn new_product(nom: &str) -> NewProduct {
    NewProduct {
        nom: nom.to_string(),
        description: String::new(),
        prix_achat: Money::from_units(1000),
        prix_vente: Money::from_units(1500),
        stock: 10,
        seuil_alerte: 5,
        categorie: "Hygiène".to_string(),
        code_barre: String::new(),
    }
}

// Mounts the five list endpoints used by load_all
async fn mount_lists(server: &MockServer, products: Value, sales: Value, purchases: Value) {
    for (route, body) in [
        ("/produits", products),
        ("/ventes", sales),
        ("/achats", purchases),
        ("/fournisseurs", json!([])),
        ("/commandes", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_load_all_fills_cache() {
    let server = MockServer::start().await;
    mount_lists(
        &server,
        json!([product_json(1, "Riz", 50), product_json(2, "Huile", 4)]),
        json!([]),
        json!([]),
    )
    .await;

    let store = store_for(&server);
    store.load_all().await.unwrap();

    assert_eq!(store.products().await.len(), 2);
    assert!(!store.is_loading().await);
    assert!(store.error().await.is_none());

    let low: Vec<String> = store.low_stock().await.into_iter().map(|p| p.nom).collect();
    assert_eq!(low, vec!["Huile".to_string()]);
}

#[tokio::test]
async fn test_load_all_failure_sets_error_slot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/achats"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Base indisponible" })),
        )
        .mount(&server)
        .await;
    for route in ["/produits", "/ventes", "/fournisseurs", "/commandes"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
    }

    let store = store_for(&server);
    let err = store.load_all().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(store.error().await.as_deref(), Some("Base indisponible"));
    assert!(!store.is_loading().await);
    assert!(store.products().await.is_empty());
}

#[tokio::test]
async fn test_delete_removes_exactly_one_item() {
    let server = MockServer::start().await;
    mount_lists(
        &server,
        json!([
            product_json(1, "Riz", 50),
            product_json(2, "Huile", 20),
            product_json(3, "Sucre", 30)
        ]),
        json!([]),
        json!([]),
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path("/produits/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Supprimé" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.load_all().await.unwrap();
    store.delete_product(2).await.unwrap();

    let ids: Vec<i64> = store.products().await.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_purchase_refreshes_products() {
    let server = MockServer::start().await;

    // Stock before the purchase, then after it
    Mock::given(method("GET"))
        .and(path("/produits"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(1, "Riz", 40)])),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/produits"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(1, "Riz", 50)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/achats"))
        .and(body_json(json!({
            "produit_id": 1,
            "fournisseur_id": 2,
            "quantite": 10,
            "prix_unitaire": 5200
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11,
            "produit_id": 1,
            "fournisseur_id": 2,
            "quantite": 10,
            "prix_unitaire": 5200,
            "prix_total": 52000,
            "date_achat": "2026-10-02T08:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.refresh_products().await.unwrap();

    let purchase = store
        .add_purchase(&NewPurchase {
            produit_id: 1,
            fournisseur_id: 2,
            quantite: 10,
            prix_unitaire: Money::from_units(5200),
        })
        .await
        .unwrap();

    assert_eq!(purchase.prix_total, Money::from_units(52_000));
    assert_eq!(store.purchases().await.len(), 1);
    assert_eq!(store.product(1).await.unwrap().stock, 50);
}

#[tokio::test]
async fn test_sale_over_stock_never_reaches_backend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/produits"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(1, "Riz", 50)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ventes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.refresh_products().await.unwrap();

    let sale = |produit_id, quantite| NewSale {
        produit_id,
        quantite,
        prix_unitaire: Money::from_units(7500),
        client_nom: "Awa".to_string(),
    };

    let err = store.add_sale(&sale(1, 60)).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Core(CoreError::InsufficientStock {
            available: 50,
            requested: 60,
            ..
        })
    ));

    let err = store.add_sale(&sale(99, 1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Core(CoreError::ProductNotFound(99))));

    assert!(store.add_sale(&sale(1, 0)).await.is_err());

    assert!(store.sales().await.is_empty());
    assert!(store.error().await.is_none());
}

#[tokio::test]
async fn test_import_stops_at_first_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/produits"))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json(7, "Savon", 10)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/produits"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Code barre déjà utilisé" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let outcome = store
        .import_products(&[new_product("Savon"), new_product("Lessive"), new_product("Javel")])
        .await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.created.len(), 1);
    let failure = outcome.failed.unwrap();
    assert_eq!(failure.product, "Lessive");
    assert_eq!(failure.message, "Code barre déjà utilisé");
    assert_eq!(store.products().await.len(), 1);
}

#[tokio::test]
async fn test_order_status_change_sends_only_status() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/commandes/3"))
        .and(body_json(json!({ "statut": "Livrée" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "produit_id": 1,
            "fournisseur_id": 2,
            "quantite": 40,
            "statut": "Livrée"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let order = store.set_order_status(3, OrderStatus::Delivered).await.unwrap();
    assert_eq!(order.statut, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_statistics_cover_current_month() {
    let server = MockServer::start().await;
    mount_lists(
        &server,
        json!([product_json(1, "Riz", 50), product_json(2, "Huile", 4)]),
        json!([
            { "id": 1, "produit_id": 1, "quantite": 2, "prix_unitaire": 5200,
              "prix_total": 10400, "date_vente": "2026-10-03T10:00:00Z" },
            { "id": 2, "produit_id": 1, "quantite": 1, "prix_unitaire": 5200,
              "prix_total": 5200, "date_vente": "2026-09-30T23:00:00Z" }
        ]),
        json!([
            { "id": 1, "produit_id": 1, "fournisseur_id": 2, "quantite": 2,
              "prix_unitaire": 4000, "prix_total": 8000, "date_achat": "2026-10-01T07:00:00Z" }
        ]),
    )
    .await;

    let store = store_for(&server);
    store.load_all().await.unwrap();

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let stats = store.statistics(now).await;

    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.total_stock, 54);
    assert_eq!(stats.month_sales, Money::from_units(10_400));
    assert_eq!(stats.month_purchases, Money::from_units(8_000));
    assert_eq!(stats.month_profit, Money::from_units(2_400));
}

#[tokio::test]
async fn test_load_all_accepts_mixed_timestamp_formats() {
    let server = MockServer::start().await;
    mount_lists(
        &server,
        json!([product_json(1, "Riz", 50)]),
        json!([
            { "id": 1, "produit_id": 1, "quantite": 2, "prix_unitaire": 5200,
              "prix_total": 10400, "date_vente": "2026-10-03T10:00:00Z" },
            { "id": 2, "produit_id": 1, "quantite": 1, "prix_unitaire": 5200,
              "prix_total": 5200, "date_vente": "2026-10-03 10:00:00" },
            { "id": 3, "produit_id": 1, "quantite": 1, "prix_unitaire": 5200,
              "prix_total": 5200, "date_vente": "Date invalide" }
        ]),
        json!([]),
    )
    .await;

    let store = store_for(&server);
    store.load_all().await.unwrap();

    let sales = store.sales().await;
    assert_eq!(sales.len(), 3);
    assert_eq!(sales[0].date_vente, sales[1].date_vente);
    assert!(sales[2].date_vente.is_none());

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    assert_eq!(store.statistics(now).await.month_sales, Money::from_units(15_600));
}

#[tokio::test]
async fn test_update_replaces_the_requested_entry() {
    let server = MockServer::start().await;
    mount_lists(
        &server,
        json!([product_json(1, "Riz", 50), product_json(2, "Huile", 20)]),
        json!([]),
        json!([]),
    )
    .await;

    // The backend answers with a different id than the one in the URL
    Mock::given(method("PUT"))
        .and(path("/produits/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(20, "Huile", 35)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.load_all().await.unwrap();
    store.update_product(2, &new_product("Huile")).await.unwrap();

    let products = store.products().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].stock, 50);
    assert_eq!(products[1].id, 20);
    assert_eq!(products[1].stock, 35);
}
