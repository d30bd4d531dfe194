#[cfg(test)]
mod tests {
    use crate::logic::{
        payment_required, plan_steps, BookingConfig, BookingContext, PaymentTiming,
        ProductSettings, ProductType, Step,
    };
    use proptest::prelude::*;

    fn timing_strategy() -> impl Strategy<Value = PaymentTiming> {
        prop_oneof![Just(PaymentTiming::None), Just(PaymentTiming::BeforeBooking)]
    }

    fn settings_strategy() -> impl Strategy<Value = ProductSettings> {
        (any::<bool>(), timing_strategy()).prop_map(|(enabled, payment_timing)| ProductSettings {
            enabled,
            payment_timing,
        })
    }

    fn config_strategy() -> impl Strategy<Value = BookingConfig> {
        (settings_strategy(), settings_strategy())
            .prop_map(|(services, packages)| BookingConfig { services, packages })
    }

    fn context_strategy() -> impl Strategy<Value = BookingContext> {
        (
            prop_oneof![Just(ProductType::Service), Just(ProductType::Package)],
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(product_type, requires_resource, user_has_valid_package, is_buy_and_book)| {
                    BookingContext {
                        product_type,
                        requires_resource,
                        user_has_valid_package,
                        is_buy_and_book,
                        payment_mode: None,
                    }
                },
            )
    }

    fn position(steps: &[Step], step: Step) -> Option<usize> {
        steps.iter().position(|s| *s == step)
    }

    proptest! {
        // Confirmation closes every plan and details always precedes it
        #[test]
        fn test_confirmation_is_last(config in config_strategy(), context in context_strategy()) {
            let steps = plan_steps(&config, &context);
            prop_assert_eq!(steps.last(), Some(&Step::Confirmation));
            prop_assert_eq!(steps.iter().filter(|s| **s == Step::Confirmation).count(), 1);
            prop_assert!(steps.contains(&Step::Details));
        }

        // No step shows up twice
        #[test]
        fn test_steps_are_unique(config in config_strategy(), context in context_strategy()) {
            let steps = plan_steps(&config, &context);
            let mut seen = std::collections::HashSet::new();
            for step in &steps {
                prop_assert!(seen.insert(*step), "duplicate step {:?} in {:?}", step, steps);
            }
        }

        // A resource is only picked after a time slot
        #[test]
        fn test_resource_follows_schedule(config in config_strategy(), context in context_strategy()) {
            let steps = plan_steps(&config, &context);
            if let Some(resource) = position(&steps, Step::Resource) {
                let schedule = position(&steps, Step::Schedule);
                prop_assert!(schedule.is_some());
                prop_assert!(schedule.unwrap_or(usize::MAX) < resource);
            }
        }

        // Payment sits right before confirmation, and only when required
        #[test]
        fn test_payment_precedes_confirmation(config in config_strategy(), context in context_strategy()) {
            let steps = plan_steps(&config, &context);
            let required = payment_required(&config, &context);
            match position(&steps, Step::Payment) {
                Some(payment) => {
                    prop_assert!(required);
                    prop_assert_eq!(payment + 1, steps.len() - 1);
                }
                None => prop_assert!(!required),
            }
        }

        // Leaving out `enabled` behaves exactly like `enabled: true`
        #[test]
        fn test_missing_enabled_means_enabled(
            before_booking in any::<bool>(),
            context in context_strategy(),
        ) {
            let timing = if before_booking { "BEFORE_BOOKING" } else { "NONE" };
            let implicit: BookingConfig = serde_json::from_value(serde_json::json!({
                "services": { "paymentTiming": timing },
                "packages": { "paymentTiming": timing },
            }))
            .unwrap();
            let explicit: BookingConfig = serde_json::from_value(serde_json::json!({
                "services": { "enabled": true, "paymentTiming": timing },
                "packages": { "enabled": true, "paymentTiming": timing },
            }))
            .unwrap();
            prop_assert_eq!(plan_steps(&implicit, &context), plan_steps(&explicit, &context));
        }

        // Holding a valid package never costs a payment step for a single service
        #[test]
        fn test_valid_package_never_pays(config in config_strategy(), requires_resource in any::<bool>()) {
            let context = BookingContext::service(requires_resource, true);
            prop_assert!(!plan_steps(&config, &context).contains(&Step::Payment));
        }
    }
}
