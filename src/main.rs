use axum::{Router, http::header, routing::get};
use groupledger::{
    GroupService, MongoStorage, UserService,
    api::{AppState, handlers::api_routes, openapi::ApiDoc},
    config::CONFIG,
    infrastructure::{ai::openai::OpenAiPlanner, media::uploader::HttpMediaHost},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(CONFIG.log_level.as_str()).init();
    info!(config = ?*CONFIG, "starting");

    let storage = MongoStorage::connect(&CONFIG.database_url, &CONFIG.database_name).await?;
    let planner = OpenAiPlanner::new(
        CONFIG.openai_base_url.clone(),
        CONFIG.openai_api_key.clone(),
        CONFIG.openai_model.clone(),
        Duration::from_secs(CONFIG.ai_timeout_secs),
    )?;
    let media = HttpMediaHost::new(CONFIG.media_upload_url.clone(), CONFIG.media_upload_preset.clone());

    let state = AppState {
        users: Arc::new(UserService::new(
            storage.clone(),
            media,
            &CONFIG.jwt_secret,
            CONFIG.bcrypt_cost,
        )),
        groups: Arc::new(GroupService::new(storage.clone(), storage, planner)),
    };

    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .nest("/api", api_routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(CONFIG.ai_timeout_secs + 30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
