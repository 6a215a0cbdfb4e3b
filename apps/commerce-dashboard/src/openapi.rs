use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value as JsonValue;
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::routes::health::HealthResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Commerce dashboard API",
        description = "Columnar chart feeds over the shop database"
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::reports::orders_over_time,
        crate::routes::reports::low_stock_levels,
        crate::routes::reports::most_popular_products,
        crate::routes::reports::revenue_generation,
        crate::routes::reports::product_category_popularity,
        crate::routes::reports::payment_method_popularity,
        crate::routes::reports::temperature_over_time,
    ),
    components(schemas(HealthResponse, ErrorBody)),
    tags((name = "reports", description = "Read-only aggregation reports"))
)]
pub struct ApiDoc;

pub fn openapi_json() -> JsonValue {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or(JsonValue::Null)
}

async fn openapi_handler() -> Json<JsonValue> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
