// --- File: crates/bookify_planner/src/routes.rs ---

use crate::handlers::{plan_steps_handler, PlannerState};
use axum::{routing::post, Router};
use bookify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing the booking planner routes.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let planner_state = Arc::new(PlannerState { config });

    Router::new()
        .route("/booking/steps", post(plan_steps_handler))
        .with_state(planner_state)
}
