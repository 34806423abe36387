use actix_web::{web, HttpResponse};
use log::warn;

use crate::api::{
    ListOrdersParams, OrderResponse, OrdersResponse, PlaceOrderResponse, StatusUpdateRequest,
    StatusUpdateResponse,
};
use crate::application::order_service::OrderService;
use crate::auth::AdminSession;
use crate::domain::order::{OrderId, OrderRequest};
use crate::domain::ports::OrderRepository;
use crate::errors::AppError;

pub type OrderState<R> = web::Data<OrderService<R>>;

/// POST /orders
///
/// Validates the checkout payload, reprices it on the server and stores the
/// order with its lines and queued notifications in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "Invalid order", body = crate::api::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_order<R: OrderRepository>(
    service: OrderState<R>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let order = web::block(move || service.place_order(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PlaceOrderResponse {
        ok: true,
        order_id: order.id,
    }))
}

/// GET /admin/orders
///
/// Newest first with nested items. `since` limits the export to orders
/// created on or after that day.
#[utoipa::path(
    get,
    path = "/admin/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Orders", body = OrdersResponse),
        (status = 401, description = "Missing or invalid admin token", body = crate::api::ErrorResponse),
    ),
    security(("admin_token" = [])),
    tag = "admin"
)]
pub async fn list_orders<R: OrderRepository>(
    _admin: AdminSession,
    service: OrderState<R>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let since = query.into_inner().since;
    let orders = web::block(move || service.list_orders(since))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrdersResponse {
        ok: true,
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

/// GET /admin/orders/{id}
#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    params(
        ("id" = i64, Path, description = "Order number"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Missing or invalid admin token", body = crate::api::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::api::ErrorResponse),
    ),
    security(("admin_token" = [])),
    tag = "admin"
)]
pub async fn get_order<R: OrderRepository>(
    _admin: AdminSession,
    service: OrderState<R>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = OrderId(path.into_inner());
    let order = web::block(move || service.get_order(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// PUT /admin/orders/{id}/status
///
/// An unknown id is not an error: the response reports `updated: 0`.
#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    params(
        ("id" = i64, Path, description = "Order number"),
    ),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status applied", body = StatusUpdateResponse),
        (status = 400, description = "Unknown status value", body = crate::api::ErrorResponse),
        (status = 401, description = "Missing or invalid admin token", body = crate::api::ErrorResponse),
    ),
    security(("admin_token" = [])),
    tag = "admin"
)]
pub async fn update_status<R: OrderRepository>(
    admin: AdminSession,
    service: OrderState<R>,
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = OrderId(path.into_inner());
    let status = body.into_inner().status;
    let updated = web::block(move || service.update_status(id, &status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if updated == 0 {
        warn!("{} tried to update missing order #{id}", admin.claims.sub);
    }
    Ok(HttpResponse::Ok().json(StatusUpdateResponse { ok: true, updated }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use serde_json::json;

    use crate::api::{ErrorResponse, OrdersResponse, PlaceOrderResponse, StatusUpdateResponse};
    use crate::handlers::testing::{admin_token, auth};

    fn order_body(name: &str) -> serde_json::Value {
        json!({
            "customer": {"name": name, "address": "House 4, Road 7", "phone": "01700000000"},
            "deliveryArea": "dhaka",
            "subtotal": 1100,
            "deliveryFee": 29,
            "total": 1129,
            "items": [{"productId": 12, "name": "Wallet", "price": 550, "quantity": 2}]
        })
    }

    fn place(body: serde_json::Value) -> test::TestRequest {
        test::TestRequest::post().uri("/orders").set_json(body)
    }

    #[actix_web::test]
    async fn place_order_returns_201_with_id() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(order_body("Rahim"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: PlaceOrderResponse = test::read_body_json(resp).await;
        assert!(body.ok);
        assert_eq!(body.order_id.0, 1);
    }

    #[actix_web::test]
    async fn empty_name_returns_400_envelope() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(order_body("  "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.ok);
        assert!(body.error.contains("name"));
    }

    #[actix_web::test]
    async fn malformed_json_returns_400_envelope() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"customer\":")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(!body.ok);
    }

    #[actix_web::test]
    async fn unknown_area_returns_400() {
        let app = test_app!();
        let mut body = order_body("Rahim");
        body["deliveryArea"] = json!("chittagong");
        let req = test::TestRequest::post().uri("/orders").set_json(body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn admin_orders_require_token() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/admin/orders").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin/orders")
            .insert_header((header::AUTHORIZATION, "Bearer forged.token.value"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn admin_lists_orders_with_server_totals() {
        let app = test_app!();
        let mut body = order_body("Rahim");
        body["total"] = json!(1);
        let _: PlaceOrderResponse =
            test::call_and_read_body_json(&app, place(body).to_request()).await;

        let req = test::TestRequest::get()
            .uri("/admin/orders")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
            .to_request();
        let listed: OrdersResponse = test::call_and_read_body_json(&app, req).await;

        assert!(listed.ok);
        assert_eq!(listed.orders.len(), 1);
        let order = &listed.orders[0];
        assert_eq!((order.subtotal, order.delivery_fee, order.total), (1100, 29, 1129));
        assert_eq!(order.items[0].name, "Wallet");
    }

    #[actix_web::test]
    async fn get_unknown_order_returns_404() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/admin/orders/99")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn status_update_reports_rows_changed() {
        let app = test_app!();
        let placed: PlaceOrderResponse =
            test::call_and_read_body_json(&app, place(order_body("Rahim")).to_request()).await;

        for (id, expected) in [(placed.order_id.0, 1), (4242, 0)] {
            let req = test::TestRequest::put()
                .uri(&format!("/admin/orders/{id}/status"))
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
                .set_json(json!({"status": "Shipped"}))
                .to_request();
            let body: StatusUpdateResponse = test::call_and_read_body_json(&app, req).await;
            assert!(body.ok);
            assert_eq!(body.updated, expected);
        }
    }

    #[actix_web::test]
    async fn invalid_status_returns_400() {
        let app = test_app!();
        let placed: PlaceOrderResponse =
            test::call_and_read_body_json(&app, place(order_body("Rahim")).to_request()).await;
        let req = test::TestRequest::put()
            .uri(&format!("/admin/orders/{}/status", placed.order_id.0))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
            .set_json(json!({"status": "teleported"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn expired_token_returns_401() {
        let app = test_app!();
        let token = auth()
            .issue("ops", Duration::from_secs(0))
            .unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        let req = test::TestRequest::get()
            .uri("/admin/orders")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
