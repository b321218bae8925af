// File: crates/services/brobook_backend/src/main.rs
use axum::{routing::get, Router};
#[cfg(feature = "availability")]
use brobook_availability::routes as availability_routes;
use brobook_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

#[tokio::main]
async fn main() {
    brobook_common::logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the BroBook API!" }))
        .merge(brobook_common::routes::routes());
    #[cfg(feature = "availability")]
    let availability_router = availability_routes::routes(config.clone());

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // mutable only when feature routers merge in
        let mut router = api_router;
        #[cfg(feature = "availability")]
        {
            router = router.merge(availability_router);
        }
        router
    });

    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "availability")]
        use brobook_availability::doc::AvailabilityApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "BroBook API",
                version = "0.1.0",
                description = "BroBook booking service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "BroBook", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // mutable only when feature docs merge in
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "availability")]
        openapi_doc.merge(AvailabilityApiDoc::openapi());
        info!("adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // Serve the booking page assets in dev mode
    if cfg!(debug_assertions) {
        info!("running in development mode, serving static files from ../../dist");
        let static_router = Router::new().nest_service("/static", ServeDir::new("../../dist"));
        app = app.merge(static_router);
        app = app.fallback_service(ServeDir::new("../dist"));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    info!("starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}
