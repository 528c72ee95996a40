//! `/api/orders` and the sales report download.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use stockroom_core::{NewOrder, Order, OrderStatus};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create))
        .route("/api/orders/reports/sales/pdf", get(sales_pdf))
        .route("/api/orders/{id}", get(get_by_id).delete(delete))
        .route("/api/orders/{id}/status", patch(update_status))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: OrderStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeriodQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.orders().list().await?))
}

async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Order>> {
    Ok(Json(state.orders().get(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = state.orders().create(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> ApiResult<Json<Order>> {
    Ok(Json(state.orders().update_status(&id, query.status).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.orders().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn sales_pdf(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let pdf = state
        .reports()
        .sales_pdf(query.start_date, query.end_date)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.filename),
        ),
        (
            header::CACHE_CONTROL,
            "must-revalidate, post-check=0, pre-check=0".to_string(),
        ),
    ];
    Ok((headers, pdf.bytes))
}
