// File: crates/services/bookify_backend/src/doc.rs
#![cfg(feature = "openapi")]
use axum::Router;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookify API",
        version = "0.1.0",
        description = "Booking wizard planning and slot availability",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    components(),
    servers((url = "/api", description = "Main API Prefix")),
)]
struct ApiDoc;

/// Swagger UI at `/api/docs` over the merged docs of the compiled-in features.
pub fn swagger_ui() -> Router {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut openapi_doc = ApiDoc::openapi();
    #[cfg(feature = "planner")]
    openapi_doc.merge(bookify_planner::doc::PlannerApiDoc::openapi());
    #[cfg(feature = "availability")]
    openapi_doc.merge(bookify_availability::doc::AvailabilityApiDoc::openapi());

    info!("Adding Swagger UI at /api/docs");
    SwaggerUi::new("/api/docs")
        .url("/api/docs/openapi.json", openapi_doc)
        .into()
}
