//! `/api/products`, including stock adjustments, searches and the product
//! reports.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use stockroom_core::report::csv::TOP_SELLERS_FILENAME;
use stockroom_core::report::trend::StockTrendEntry;
use stockroom_core::{
    NewProduct, ProductDetails, ProductUpdate, StockAdjustment, StockDirection, LOW_STOCK_THRESHOLD,
};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/by-category", get(by_category))
        .route("/api/products/by-name", get(by_name))
        .route("/api/products/low-stock", get(low_stock))
        .route("/api/products/stock-trends", get(stock_trends))
        .route("/api/products/reports/top-sellers/csv", get(top_sellers_csv))
        .route("/api/products/{id}", get(get_by_id).put(update).delete(delete))
        .route("/api/products/{id}/stock/increase", post(increase_stock))
        .route("/api/products/{id}/stock/decrease", post(decrease_stock))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByCategory {
    category_name: String,
}

#[derive(Debug, Deserialize)]
struct ByName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Threshold {
    threshold: Option<i64>,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductDetails>>> {
    Ok(Json(state.products().list().await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductDetails>> {
    Ok(Json(state.products().get(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductDetails>)> {
    let product = state.products().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ProductUpdate>,
) -> ApiResult<Json<ProductDetails>> {
    Ok(Json(state.products().update(&id, input).await?))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_category(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ByCategory>,
) -> ApiResult<Json<Vec<ProductDetails>>> {
    Ok(Json(state.products().by_category(&query.category_name).await?))
}

async fn by_name(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ByName>,
) -> ApiResult<Json<Vec<ProductDetails>>> {
    Ok(Json(state.products().by_name(&query.name).await?))
}

async fn low_stock(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<Threshold>,
) -> ApiResult<Json<Vec<ProductDetails>>> {
    let threshold = query.threshold.unwrap_or(LOW_STOCK_THRESHOLD);
    Ok(Json(state.products().low_stock(threshold).await?))
}

async fn increase_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<StockAdjustment>,
) -> ApiResult<Json<ProductDetails>> {
    let product = state
        .products()
        .adjust_stock(&id, StockDirection::Increase, input)
        .await?;
    Ok(Json(product))
}

async fn decrease_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<StockAdjustment>,
) -> ApiResult<Json<ProductDetails>> {
    let product = state
        .products()
        .adjust_stock(&id, StockDirection::Decrease, input)
        .await?;
    Ok(Json(product))
}

async fn stock_trends(State(state): State<AppState>) -> ApiResult<Json<Vec<StockTrendEntry>>> {
    Ok(Json(state.reports().stock_trends().await?))
}

async fn top_sellers_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let csv = state.reports().top_sellers_csv().await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{TOP_SELLERS_FILENAME}\""),
        ),
    ];
    Ok((headers, csv))
}
