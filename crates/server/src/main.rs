use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use shared::{
    domain::{ProductDraft, ProductId},
    error::{ApiError, ErrorCode},
    protocol::{AckResponse, ProductCreatedResponse, ProductListResponse, ProductPatch},
};
use storage::Storage;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{product_route, products_route, ApiContext};
use app_state::AppState;
use config::{load_settings, prepare_database_url};

type EnvelopeReply<T> = (StatusCode, Json<T>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, %database_url, "product store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(products_route(), get(http_list_products).post(http_create_product))
        .route(
            product_route(),
            put(http_update_product).delete(http_delete_product),
        )
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(error) => {
            warn!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

fn status_for(error: &ApiError) -> StatusCode {
    match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    ApiError::validation(format!("invalid request body: {}", rejection.body_text()))
}

async fn http_list_products(
    State(state): State<Arc<AppState>>,
) -> EnvelopeReply<ProductListResponse> {
    match api::list_products(&state.api).await {
        Ok(products) => (StatusCode::OK, Json(ProductListResponse::ok(products))),
        Err(error) => (
            status_for(&error),
            Json(ProductListResponse {
                success: false,
                productos: None,
                error: Some(error.message),
            }),
        ),
    }
}

async fn http_create_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> EnvelopeReply<ProductCreatedResponse> {
    let result = match payload {
        Ok(Json(draft)) => api::create_product(&state.api, draft).await,
        Err(rejection) => Err(rejection_error(rejection)),
    };
    match result {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ProductCreatedResponse::ok(product)),
        ),
        Err(error) => (
            status_for(&error),
            Json(ProductCreatedResponse {
                success: false,
                producto: None,
                error: Some(error.message),
            }),
        ),
    }
}

async fn http_update_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> EnvelopeReply<AckResponse> {
    let result = match payload {
        Ok(Json(patch)) => api::update_product(&state.api, ProductId(product_id), patch)
            .await
            .map(|_| ()),
        Err(rejection) => Err(rejection_error(rejection)),
    };
    ack(result, "Product updated")
}

async fn http_delete_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> EnvelopeReply<AckResponse> {
    ack(
        api::delete_product(&state.api, ProductId(product_id)).await,
        "Product deleted",
    )
}

fn ack(result: Result<(), ApiError>, message: &str) -> EnvelopeReply<AckResponse> {
    match result {
        Ok(()) => (StatusCode::OK, Json(AckResponse::ok(message))),
        Err(error) => (status_for(&error), Json(AckResponse::from(error))),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
