// File: crates/bookify_planner/src/handlers.rs
use crate::logic::{plan, BookingPlan, PlanStepsRequest};
use axum::{extract::State, response::Json};
use bookify_common::{service_unavailable, BookifyError};
use bookify_config::AppConfig;
use std::sync::Arc;
use tracing::{debug, info};

// Shared state needed by the planner handlers
#[derive(Clone)]
pub struct PlannerState {
    pub config: Arc<AppConfig>,
}

/// Handler deriving the wizard steps for one booking attempt.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/booking/steps",
    request_body = PlanStepsRequest,
    responses(
        (status = 200, description = "Ordered booking steps", body = BookingPlan),
        (status = 422, description = "Malformed booking context"),
        (status = 503, description = "Planner disabled")
    ),
    tag = "Planner"
))]
pub async fn plan_steps_handler(
    State(state): State<Arc<PlannerState>>,
    Json(request): Json<PlanStepsRequest>,
) -> Result<Json<BookingPlan>, BookifyError> {
    if !state.config.use_planner {
        info!("Planner request rejected: planner disabled");
        return Err(service_unavailable("Planner service is disabled."));
    }

    debug!(
        "Planning steps for context {:?} with config {:?}",
        request.context, request.booking_config
    );
    Ok(Json(plan(&request.booking_config, &request.context)))
}
