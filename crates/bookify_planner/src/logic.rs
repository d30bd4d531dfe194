// --- File: crates/bookify_planner/src/logic.rs ---
use serde::{Deserialize, Serialize};
use tracing::debug;

// --- Data Structures ---

/// One page of the booking wizard.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Service,
    Package,
    Resource,
    Schedule,
    Details,
    Payment,
    Confirmation,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Service,
    Package,
}

/// When payment is collected for a product type.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentTiming {
    #[default]
    None,
    BeforeBooking,
}

/// Settings of one product type. A missing section or field means enabled,
/// with no upfront payment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductSettings {
    pub enabled: bool,
    pub payment_timing: PaymentTiming,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            payment_timing: PaymentTiming::None,
        }
    }
}

impl ProductSettings {
    pub fn pays_before_booking(&self) -> bool {
        self.payment_timing == PaymentTiming::BeforeBooking
    }
}

/// Per-business booking settings.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BookingConfig {
    pub services: ProductSettings,
    pub packages: ProductSettings,
}

/// What the customer is doing in this booking attempt.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingContext {
    pub product_type: ProductType,
    #[serde(default)]
    pub requires_resource: bool,
    #[serde(default)]
    pub user_has_valid_package: bool,
    #[serde(default)]
    pub is_buy_and_book: bool,
    /// Passed through to the plan untouched.
    #[serde(default)]
    pub payment_mode: Option<String>,
}

impl BookingContext {
    pub fn service(requires_resource: bool, user_has_valid_package: bool) -> Self {
        Self {
            product_type: ProductType::Service,
            requires_resource,
            user_has_valid_package,
            is_buy_and_book: false,
            payment_mode: None,
        }
    }

    pub fn package() -> Self {
        Self {
            product_type: ProductType::Package,
            requires_resource: false,
            user_has_valid_package: false,
            is_buy_and_book: false,
            payment_mode: None,
        }
    }

    pub fn buy_and_book(requires_resource: bool) -> Self {
        Self {
            product_type: ProductType::Package,
            requires_resource,
            user_has_valid_package: false,
            is_buy_and_book: true,
            payment_mode: None,
        }
    }

    /// Resolves the flags into the flow they describe. Buy-and-book wins over
    /// the product type.
    pub fn flow(&self) -> BookingFlow {
        if self.is_buy_and_book {
            return BookingFlow::BuyAndBook {
                requires_resource: self.requires_resource,
            };
        }
        match self.product_type {
            ProductType::Service => BookingFlow::Service {
                requires_resource: self.requires_resource,
                user_has_valid_package: self.user_has_valid_package,
            },
            ProductType::Package => BookingFlow::Package,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFlow {
    Service {
        requires_resource: bool,
        user_has_valid_package: bool,
    },
    Package,
    BuyAndBook {
        requires_resource: bool,
    },
}

impl BookingFlow {
    fn sells_package(&self) -> bool {
        matches!(self, BookingFlow::Package | BookingFlow::BuyAndBook { .. })
    }

    /// `Some(requires_resource)` when the flow picks a time slot.
    fn schedules(&self) -> Option<bool> {
        match *self {
            BookingFlow::Service {
                requires_resource, ..
            }
            | BookingFlow::BuyAndBook { requires_resource } => Some(requires_resource),
            BookingFlow::Package => None,
        }
    }
}

/// Result of planning one booking attempt.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPlan {
    pub steps: Vec<Step>,
    pub payment_required: bool,
    pub payment_mode: Option<String>,
}

/// Body of `POST /booking/steps`: the booking context plus the business settings.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlanStepsRequest {
    #[serde(flatten)]
    pub context: BookingContext,
    #[serde(default)]
    pub booking_config: BookingConfig,
}

// --- Planning Logic ---

/// Whether the attempt must pass through the payment step.
///
/// Packages follow the package timing. Single services follow the service
/// timing unless the customer already holds a valid package.
pub fn payment_required(config: &BookingConfig, context: &BookingContext) -> bool {
    match context.flow() {
        BookingFlow::Package | BookingFlow::BuyAndBook { .. } => {
            config.packages.pays_before_booking()
        }
        BookingFlow::Service {
            user_has_valid_package,
            ..
        } => config.services.pays_before_booking() && !user_has_valid_package,
    }
}

/// Derives the ordered wizard steps for a booking attempt.
///
/// The order is fixed: package, service, schedule, resource, details, payment,
/// confirmation, each present only when it applies. Resource always follows
/// schedule and confirmation is always last.
pub fn plan_steps(config: &BookingConfig, context: &BookingContext) -> Vec<Step> {
    let flow = context.flow();
    let mut steps = Vec::with_capacity(7);

    if flow.sells_package() && config.packages.enabled {
        steps.push(Step::Package);
    }

    if let Some(requires_resource) = flow.schedules() {
        if config.services.enabled {
            steps.push(Step::Service);
        }
        steps.push(Step::Schedule);
        if requires_resource {
            steps.push(Step::Resource);
        }
    }

    steps.push(Step::Details);

    if payment_required(config, context) {
        steps.push(Step::Payment);
    }

    steps.push(Step::Confirmation);

    debug!("Planned steps for {:?}: {:?}", flow, steps);
    steps
}

/// [`plan_steps`] plus the payment decision and the caller's payment mode.
pub fn plan(config: &BookingConfig, context: &BookingContext) -> BookingPlan {
    BookingPlan {
        steps: plan_steps(config, context),
        payment_required: payment_required(config, context),
        payment_mode: context.payment_mode.clone(),
    }
}
