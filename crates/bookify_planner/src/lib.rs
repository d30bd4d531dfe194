// --- File: crates/bookify_planner/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;

pub use logic::{
    payment_required, plan, plan_steps, BookingConfig, BookingContext, BookingFlow, BookingPlan,
    PaymentTiming, ProductSettings, ProductType, Step,
};
