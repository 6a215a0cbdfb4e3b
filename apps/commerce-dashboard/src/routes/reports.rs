use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value as JsonValue;

use crate::error::{ErrorBody, ReportError, ReportResult};
use crate::reports::{self, run_columnar, Columnar};
use crate::services::weather::DateRange;
use crate::state::AppState;

type Counts = Json<Columnar<String, i64>>;
type Amounts = Json<Columnar<String, f64>>;

#[utoipa::path(
    get,
    path = "/api/orders_over_time",
    tag = "reports",
    responses(
        (status = 200, description = "Order count per day: {dates, counts}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn orders_over_time(State(state): State<AppState>) -> ReportResult<Counts> {
    Ok(Json(run_columnar(&state.db, &reports::orders_over_time()).await?))
}

#[utoipa::path(
    get,
    path = "/api/low_stock_levels",
    tag = "reports",
    responses(
        (status = 200, description = "Products with fewer than 20 units in stock: {products, quantities}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn low_stock_levels(State(state): State<AppState>) -> ReportResult<Counts> {
    Ok(Json(run_columnar(&state.db, &reports::low_stock_levels()).await?))
}

#[utoipa::path(
    get,
    path = "/api/most_popular_products",
    tag = "reports",
    responses(
        (status = 200, description = "Top 10 products by units ordered: {products, quantities}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn most_popular_products(State(state): State<AppState>) -> ReportResult<Counts> {
    Ok(Json(
        run_columnar(&state.db, &reports::most_popular_products()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/revenue_generation",
    tag = "reports",
    responses(
        (status = 200, description = "Revenue per day: {dates, revenues}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn revenue_generation(State(state): State<AppState>) -> ReportResult<Amounts> {
    Ok(Json(
        run_columnar(&state.db, &reports::revenue_generation()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/product_category_popularity",
    tag = "reports",
    responses(
        (status = 200, description = "Sales per category: {categories, sales}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn product_category_popularity(
    State(state): State<AppState>,
) -> ReportResult<Amounts> {
    Ok(Json(
        run_columnar(&state.db, &reports::product_category_popularity()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/payment_method_popularity",
    tag = "reports",
    responses(
        (status = 200, description = "Payments per method: {methods, counts}"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn payment_method_popularity(
    State(state): State<AppState>,
) -> ReportResult<Counts> {
    Ok(Json(
        run_columnar(&state.db, &reports::payment_method_popularity()).await?,
    ))
}

/// Daily maximum temperature across the span of recorded orders, proxied
/// from the weather archive without reshaping.
#[utoipa::path(
    get,
    path = "/api/temperature_over_time",
    tag = "reports",
    responses(
        (status = 200, description = "Upstream weather archive payload, unmodified"),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub(crate) async fn temperature_over_time(
    State(state): State<AppState>,
) -> ReportResult<Json<JsonValue>> {
    let (first, last) = reports::order_date_bounds(&state.db).await?;
    let range = DateRange::from_bounds(first.as_deref(), last.as_deref())
        .map_err(ReportError::InvalidDateRange)?;
    tracing::debug!(start = %range.start, end = %range.end, "fetching temperature history");
    let payload = state.weather.daily_max_temperature(range).await?;
    Ok(Json(payload))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders_over_time", get(orders_over_time))
        .route("/low_stock_levels", get(low_stock_levels))
        .route("/most_popular_products", get(most_popular_products))
        .route("/revenue_generation", get(revenue_generation))
        .route(
            "/product_category_popularity",
            get(product_category_popularity),
        )
        .route("/payment_method_popularity", get(payment_method_popularity))
        .route("/temperature_over_time", get(temperature_over_time))
}
