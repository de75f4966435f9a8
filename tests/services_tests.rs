//! Service wiring, statistics and catalog queries over the in-memory store

mod helpers;

use std::sync::Arc;
use serde_json::json;
use ShopAdmin::config::Settings;
use ShopAdmin::models::Collection;
use ShopAdmin::services::ServiceFactory;
use ShopAdmin::state::{InMemorySessionStore, SessionStore};
use helpers::*;

async fn services_with_catalog() -> (ServiceFactory, Arc<RecordingRecordStore>) {
    let store = Arc::new(RecordingRecordStore::new());
    seed_categories(&store, &["Alimentos", "Limpieza"]).await;

    let services = ServiceFactory::new(
        &Settings::default(),
        store.clone(),
        Arc::new(InMemorySessionStore::new(chrono::Duration::minutes(30))),
    );

    for (name, price, category) in [("Huevos", 1200, "Alimentos"), ("Arroz", 1000, "alimentos"), ("Cloro", 2000, "Limpieza")] {
        services
            .catalog
            .create(
                Collection::Products,
                fields(json!({"nombre": name, "precio": price, "categoria": category})),
            )
            .await
            .unwrap();
    }
    (services, store)
}

#[tokio::test]
async fn test_health_check_on_fresh_services() {
    let (services, _) = services_with_catalog().await;
    let health = services.health_check().await;

    assert!(health.is_healthy());
    assert_eq!(health.active_sessions, Some(0));
    assert!(health.get_issues().is_empty());
}

#[tokio::test]
async fn test_general_stats_counts_everything() {
    let (services, _) = services_with_catalog().await;
    let text = services.stats.general().await;

    assert!(text.contains("📦 PRODUCTOS:\n• Total: 3"));
    assert!(text.contains("📂 CATEGORÍAS:\n• Total: 2"));
    assert!(text.contains("• Rango: $1.000 - $2.000"));
    assert!(text.contains("📰 PUBLICACIONES:\n• Total: 0"));
}

#[tokio::test]
async fn test_products_in_category_ignores_case() {
    let (services, _) = services_with_catalog().await;

    let in_food = services.catalog.products_in_category("ALIMENTOS").await;
    assert_eq!(in_food.len(), 2);
    assert_eq!(services.catalog.products_in_category("Bebidas").await.len(), 0);
}

#[tokio::test]
async fn test_category_names_listed() {
    let (services, _) = services_with_catalog().await;
    let mut names = services.catalog.category_names().await;
    names.sort();
    assert_eq!(names, vec!["Alimentos".to_string(), "Limpieza".to_string()]);
}

#[tokio::test]
async fn test_flow_started_through_factory_counts_as_session() {
    let (services, _) = services_with_catalog().await;

    services.flows.start(OWNER, Collection::Categories).await.unwrap();
    assert!(services.flows.has_active_flow(OWNER).await.unwrap());
    assert_eq!(services.health_check().await.active_sessions, Some(1));

    assert!(services.flows.cancel(OWNER).await.unwrap());
    assert!(!services.flows.cancel(OWNER).await.unwrap());
    assert!(services.flows.sessions().active_owners().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_through_catalog() {
    let (services, store) = services_with_catalog().await;
    let products = services.catalog.list(Collection::Products).await;
    let target = products.iter().find(|p| p.label() == "Cloro").unwrap();

    assert!(services.catalog.delete(Collection::Products, &target.id).await.unwrap());
    assert_eq!(services.catalog.list(Collection::Products).await.len(), 2);
    assert_eq!(store.writes().len(), 3);
}
