use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use merx_order::{LineRequest, Order, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NewOrderRequest {
    pub customer_id: String,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

/// One requested line. A `unit_price` may be submitted but is ignored:
/// pricing is always resolved from the catalog.
#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub sku: String,
    pub qty: u32,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

impl From<OrderLineRequest> for LineRequest {
    fn from(line: OrderLineRequest) -> Self {
        LineRequest {
            sku: line.sku,
            qty: line.qty,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: String,
    pub items: Vec<OrderItemResponse>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub sku: String,
    pub qty: u32,
    pub unit_price: f64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    sku: item.sku,
                    qty: item.qty,
                    unit_price: item.unit_price,
                })
                .collect(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<NewOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lines = req.items.into_iter().map(Into::into).collect();
    let order = state.orders.create(&req.customer_id, lines).await?;

    let location = format!("/api/orders/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(OrderResponse::from(order)),
    ))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.get(id).await?;
    Ok(Json(order.into()))
}

/// GET /api/orders?status=NEW
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.orders.list(params.status).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// PUT /api/orders/{id} — replace items, NEW orders only
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let lines = req.items.into_iter().map(Into::into).collect();
    let order = state.orders.update_items(id, lines).await?;
    Ok(Json(order.into()))
}

/// DELETE /api/orders/{id} — NEW orders only
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/orders/{id}/pay
///
/// Runs the settlement workflow synchronously and returns the refreshed
/// order. A failed payment is not an HTTP error: the response body shows
/// the order in FAILED_PAYMENT.
pub async fn pay_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.get(id).await?;
    if order.status != OrderStatus::New {
        return Err(AppError::BadRequest(format!(
            "order {} is {}; only NEW orders can be paid",
            id, order.status
        )));
    }

    state.payments.settle(id, order.total).await?;

    let refreshed = state.orders.get(id).await?;
    Ok(Json(refreshed.into()))
}
