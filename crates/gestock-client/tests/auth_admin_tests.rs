use gestock_client::auth::LOGIN_ERROR_MESSAGE;
use gestock_client::storage::{TOKEN_KEY, USER_KEY};
use gestock_client::{
    ApiClient, AuthStore, ClientConfig, ClientError, SessionStorage, TenantAdmin,
};
use gestock_core::{Count, Money, Role, User};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin_for(server: &MockServer) -> TenantAdmin {
    let storage = SessionStorage::in_memory();
    storage.set_item(TOKEN_KEY, "root-token").unwrap();
    let api = ApiClient::new(&ClientConfig::with_base_url(server.uri()), storage).unwrap();
    TenantAdmin::new(api)
}

#[tokio::test]
async fn test_login_persists_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "awa@boutique.sn", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-123",
            "user": {
                "id": 4,
                "nom": "Diop",
                "prenom": "Awa",
                "email": "awa@boutique.sn",
                "role": "gestionnaire",
                "client_id": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = SessionStorage::in_memory();
    let config = ClientConfig::with_base_url(server.uri());
    let auth = AuthStore::new(&config, storage.clone()).unwrap();

    let user = auth.login("awa@boutique.sn", "secret").await.unwrap();
    assert_eq!(user.role, Role::Gestionnaire);
    assert!(auth.is_authenticated().await);
    assert!(auth.can_buy().await);
    assert!(!auth.is_admin().await);

    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("jwt-123"));
    let stored: User = storage.get_json(USER_KEY).unwrap();
    assert_eq!(stored.client_id, Some(2));

    // A fresh store over the same storage picks the session back up
    let restored = AuthStore::new(&config, storage).unwrap();
    assert!(restored.restore().await);
    assert_eq!(restored.token().await.as_deref(), Some("jwt-123"));
}

#[tokio::test]
async fn test_login_failure_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "awa@boutique.sn", "password": "wrong" })))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Email ou mot de passe incorrect" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "awa@boutique.sn", "password": "boom" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = SessionStorage::in_memory();
    let auth = AuthStore::new(&ClientConfig::with_base_url(server.uri()), storage.clone()).unwrap();

    let err = auth.login("awa@boutique.sn", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Email ou mot de passe incorrect");
    assert!(err.is_unauthorized());

    let err = auth.login("awa@boutique.sn", "boom").await.unwrap_err();
    assert_eq!(err.user_message(), LOGIN_ERROR_MESSAGE);

    assert!(!auth.is_authenticated().await);
    assert!(storage.get_item(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_tenant_status_and_extension_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/super-admin/clients/5/status"))
        .and(header("authorization", "Bearer root-token"))
        .and(body_json(json!({ "actif": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/super-admin/clients/5/extend"))
        .and(body_json(json!({ "mois": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let admin = admin_for(&server);
    admin.set_active(5, false).await.unwrap();
    admin.extend_subscription(5, 3).await.unwrap();

    // Non-positive extensions are refused before any request
    let err = admin.extend_subscription(5, 0).await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)));
}

#[tokio::test]
async fn test_dashboard_with_string_counts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/super-admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": {
                "clients_actifs": "12",
                "clients_inactifs": 3,
                "clients_expires": "1",
                "total_users": "40",
                "total_produits": 800,
                "total_ventes": "1500",
                "total_achats": "600",
                "ca_total": 2500000
            },
            "top_clients": [
                { "id": 2, "nom_entreprise": "Boutique Awa", "nb_ventes": "320" }
            ],
            "stats_par_mois": [
                { "mois": "2026-09", "nouveaux_clients": "4" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = admin_for(&server).dashboard().await.unwrap();
    assert_eq!(dashboard.stats.clients_actifs, Count(12));
    assert_eq!(dashboard.stats.ca_total, Money::from_units(2_500_000));
    assert_eq!(dashboard.top_clients[0].nom_entreprise, "Boutique Awa");
    assert_eq!(dashboard.top_clients[0].nb_ventes, Count(320));
    assert_eq!(dashboard.stats_par_mois[0].nouveaux_clients, Count(4));
}

#[tokio::test]
async fn test_login_with_unwritable_storage_keeps_no_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-123",
            "user": { "id": 4, "nom": "Diop", "email": "awa@boutique.sn", "role": "vendeur" }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "plain file").unwrap();
    let storage = SessionStorage::open(blocker.join("session.json")).unwrap();

    let auth = AuthStore::new(&ClientConfig::with_base_url(server.uri()), storage.clone()).unwrap();
    let err = auth.login("awa@boutique.sn", "secret").await.unwrap_err();

    assert!(matches!(err, ClientError::Storage(_)));
    assert!(!auth.is_authenticated().await);
    assert!(storage.get_item(TOKEN_KEY).is_none());
    assert!(storage.get_item(USER_KEY).is_none());
}

#[tokio::test]
async fn test_client_stats_decoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/super-admin/clients/2/stats"))
        .and(header("authorization", "Bearer root-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client": {
                "id": 2,
                "nom_entreprise": "Boutique Awa",
                "email": "contact@awa.sn",
                "date_expiration": "2026-12-31",
                "actif": true
            },
            "stats": {
                "nb_users": "3",
                "nb_produits": 120,
                "nb_fournisseurs": "8",
                "ca_total": 1850000,
                "nb_ventes": "320",
                "depenses_total": "1200000",
                "nb_achats": 45
            },
            "top_produits": [
                { "id": 7, "nom": "Riz parfumé", "quantite_vendue": "140", "ca_genere": 1050000 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = admin_for(&server).client_stats(2).await.unwrap();
    assert_eq!(stats.client.nom_entreprise, "Boutique Awa");
    assert_eq!(stats.client.date_expiration.as_deref(), Some("2026-12-31"));
    assert_eq!(stats.stats.nb_users, Count(3));
    assert_eq!(stats.stats.nb_ventes, Count(320));
    assert_eq!(stats.stats.depenses_total, Money::from_units(1_200_000));
    assert_eq!(stats.top_produits[0].nom, "Riz parfumé");
    assert_eq!(stats.top_produits[0].quantite_vendue, Count(140));
    assert_eq!(stats.top_produits[0].ca_genere, Money::from_units(1_050_000));
}
