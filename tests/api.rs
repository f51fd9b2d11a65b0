use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tawsil_client::{
    models::{cart::Cart, order::OrderStatus, restaurant::{MenuItem, Restaurant}, tracking::TrackingView},
    services::session::{MemoryTokenStore, TokenStore},
    ClientConfig, ClientState, TawsilError,
};

const TOKEN: &str = "test-token";

#[derive(Default)]
struct Backend {
    status_updates: AtomicUsize,
}

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> Reply {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "غير مصرح"})))
}

fn user() -> Value {
    json!({"id": "u1", "name": "Lina", "phone": "0933000000", "role": "customer"})
}

fn order(id: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u1",
        "restaurant_id": "r1",
        "restaurant_name": "Al Sham",
        "items": [],
        "subtotal": 10000.0,
        "delivery_fee": 2000.0,
        "total": 12000.0,
        "payment_method": "COD",
        "order_status": "out_for_delivery",
        "created_at": created_at
    })
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] == "secret" {
        (StatusCode::OK, Json(json!({"access_token": TOKEN, "token_type": "bearer", "user": user()})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "رقم الهاتف أو كلمة المرور غير صحيحة"})))
    }
}

async fn me(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(user()))
}

async fn orders(headers: HeaderMap) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let list = json!([
        order("o1", "2025-03-01T10:00:00"),
        {"id": "broken", "total": "lots"},
        order("o2", "2025-03-02T18:30:00.123456")
    ]);
    (StatusCode::OK, Json(list))
}

async fn create_order(headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    let quantity = body["items"][0]["quantity"].as_u64().unwrap_or(0);
    let mut placed = order("o3", "2025-03-03T12:00:00");
    placed["restaurant_id"] = body["restaurant_id"].clone();
    placed["items"] = json!([{
        "menu_item_id": body["items"][0]["menu_item_id"].clone(),
        "name": "Shawarma",
        "price": 5000.0,
        "quantity": quantity,
        "subtotal": 5000.0 * quantity as f64
    }]);
    placed["order_status"] = json!("pending");
    (StatusCode::OK, Json(placed))
}

async fn driver_location(headers: HeaderMap, Path(order_id): Path<String>) -> Reply {
    if !authorized(&headers) {
        return unauthorized();
    }
    match order_id.as_str() {
        "waiting" => (
            StatusCode::OK,
            Json(json!({"driver_location": null, "driver_assigned": false, "message": "لم يتم تعيين سائق بعد"})),
        ),
        "live" => (
            StatusCode::OK,
            Json(json!({
                "driver_assigned": true,
                "has_location": true,
                "driver_location": {"lat": 33.5138, "lng": 36.2765},
                "driver_name": "Omar",
                "order_status": "out_for_delivery",
                "phase": "delivering",
                "phase_text": "السائق في الطريق إليك",
                "eta_to_customer_min": 9
            })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "الطلب غير موجود"}))),
    }
}

async fn restaurant_status(State(backend): State<Arc<Backend>>) -> Reply {
    backend.status_updates.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, Json(json!({"message": "تم تحديث حالة الطلب"})))
}

async fn unread_count() -> Reply {
    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "الخدمة غير متاحة"})))
}

async fn logout() -> Reply {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})))
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/orders", get(orders).post(create_order))
        .route("/api/orders/:id/driver-location", get(driver_location))
        .route("/api/restaurant/orders/:id/status", put(restaurant_status))
        .route("/api/notifications/unread-count", get(unread_count))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), backend)
}

async fn client(backend_url: String, store: Arc<MemoryTokenStore>) -> ClientState {
    let config = ClientConfig {
        backend_url,
        poll_interval: Duration::from_secs(8),
        request_timeout: Duration::from_secs(5),
        token_path: None,
    };
    ClientState::with_token_store(config, store).await.unwrap()
}

#[tokio::test]
async fn test_login_persists_token_and_sends_bearer() {
    let (url, _) = spawn_backend().await;
    let store = Arc::new(MemoryTokenStore::default());
    let state = client(url, store.clone()).await;

    let user = state.session.login("0933000000", "secret").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(store.load().await.unwrap().as_deref(), Some(TOKEN));

    let me = state.session.me().await.unwrap();
    assert_eq!(me.name, "Lina");
}

#[tokio::test]
async fn test_wrong_password_maps_detail() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;

    match state.session.login("0933000000", "nope").await {
        Err(TawsilError::Unauthorized(detail)) => assert_eq!(detail, "رقم الهاتف أو كلمة المرور غير صحيحة"),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
    assert!(!state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_restored_token_is_checked() {
    let (url, _) = spawn_backend().await;

    let good = Arc::new(MemoryTokenStore::default());
    good.save(TOKEN).await.unwrap();
    let state = client(url.clone(), good).await;
    assert!(state.session.check_auth().await.unwrap().is_some());

    let stale = Arc::new(MemoryTokenStore::default());
    stale.save("expired").await.unwrap();
    let state = client(url, stale.clone()).await;
    assert!(state.session.check_auth().await.unwrap().is_none());
    assert!(stale.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_order_list_skips_malformed_and_sorts_newest_first() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;
    state.session.login("0933000000", "secret").await.unwrap();

    let orders = state.order_service.get_orders().await.unwrap();
    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["o2", "o1"]);
    assert_eq!(orders[0].order_status, OrderStatus::OutForDelivery);
}

#[tokio::test]
async fn test_driver_location_shapes() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;
    state.session.login("0933000000", "secret").await.unwrap();

    let waiting = state.order_service.driver_location("waiting").await.unwrap();
    assert!(!waiting.driver_assigned);
    assert!(matches!(TrackingView::from_snapshot(waiting), TrackingView::NoDriver { .. }));

    let live = state.order_service.driver_location("live").await.unwrap();
    assert!(live.has_location);
    assert_eq!(live.current_eta_min(), Some(9));

    match state.order_service.driver_location("missing").await {
        Err(TawsilError::NotFound(detail)) => assert_eq!(detail, "الطلب غير موجود"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tracking_against_backend() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;
    state.session.login("0933000000", "secret").await.unwrap();

    let mut handle = state.tracking_service.start("live");
    match handle.changed().await.unwrap() {
        TrackingView::Live { snapshot, progress } => {
            assert_eq!(snapshot.driver_name.as_deref(), Some("Omar"));
            assert_eq!(progress.current_index, Some(2));
        }
        other => panic!("expected a live view, got {:?}", other),
    }

    state.shutdown().await.unwrap();
    assert!(!handle.is_open());
    assert!(!state.session.is_authenticated().await);
}

#[tokio::test]
async fn test_disallowed_status_never_reaches_backend() {
    let (url, backend) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;
    state.session.login("0933000000", "secret").await.unwrap();

    let result = state
        .restaurant_panel_service
        .update_order_status("o1", OrderStatus::Delivered)
        .await;
    assert!(matches!(result, Err(TawsilError::InvalidFieldValue { .. })));
    assert_eq!(backend.status_updates.load(Ordering::SeqCst), 0);

    state
        .restaurant_panel_service
        .update_order_status("o1", OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(backend.status_updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_other_statuses_map_to_api_error() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;

    match state.notification_service.unread_count().await {
        Err(TawsilError::Api { status, detail }) => {
            assert_eq!(status, 503);
            assert_eq!(detail, "الخدمة غير متاحة");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_checkout_places_cart_as_order() {
    let (url, _) = spawn_backend().await;
    let state = client(url, Arc::new(MemoryTokenStore::default())).await;
    state.session.login("0933000000", "secret").await.unwrap();

    let restaurant: Restaurant =
        serde_json::from_value(json!({"id": "r1", "name": "Al Sham", "delivery_fee": 2000.0, "min_order": 5000.0}))
            .unwrap();
    let shawarma: MenuItem = serde_json::from_value(json!({
        "id": "m1", "restaurant_id": "r1", "name": "Shawarma", "price": 5000.0, "category": "main"
    }))
    .unwrap();

    let mut cart = Cart::new();
    cart.add_item(shawarma.clone(), &restaurant);
    cart.add_item(shawarma, &restaurant);

    let placed = state
        .order_service
        .checkout(cart, "a1", "COD", None, None)
        .await
        .unwrap();
    assert_eq!(placed.restaurant_id, "r1");
    assert_eq!(placed.items[0].menu_item_id, "m1");
    assert_eq!(placed.items[0].quantity, 2);
    assert_eq!(placed.order_status, OrderStatus::Pending);
}
