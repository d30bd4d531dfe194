// File: crates/bookify_planner/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    BookingConfig, BookingContext, BookingPlan, PaymentTiming, PlanStepsRequest, ProductSettings,
    ProductType, Step,
};

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::plan_steps_handler),
    components(schemas(
        PlanStepsRequest,
        BookingContext,
        BookingConfig,
        ProductSettings,
        PaymentTiming,
        ProductType,
        BookingPlan,
        Step
    )),
    tags((name = "Planner", description = "Booking wizard step planning"))
)]
pub struct PlannerApiDoc;
