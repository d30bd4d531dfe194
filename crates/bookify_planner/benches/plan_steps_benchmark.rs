use bookify_planner::logic::{
    plan, plan_steps, BookingConfig, BookingContext, PaymentTiming, ProductSettings,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn upfront_config() -> BookingConfig {
    let pay_upfront = ProductSettings {
        enabled: true,
        payment_timing: PaymentTiming::BeforeBooking,
    };
    BookingConfig {
        services: pay_upfront,
        packages: pay_upfront,
    }
}

fn benchmark_plan_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_steps");

    let default_config = BookingConfig::default();
    let upfront = upfront_config();

    group.bench_function("service_default_config", |b| {
        let context = BookingContext::service(false, false);
        b.iter(|| plan_steps(black_box(&default_config), black_box(&context)))
    });

    group.bench_function("service_with_resource_and_payment", |b| {
        let context = BookingContext::service(true, false);
        b.iter(|| plan_steps(black_box(&upfront), black_box(&context)))
    });

    group.bench_function("buy_and_book", |b| {
        let context = BookingContext::buy_and_book(true);
        b.iter(|| plan_steps(black_box(&upfront), black_box(&context)))
    });

    group.bench_function("full_plan_with_payment_mode", |b| {
        let mut context = BookingContext::package();
        context.payment_mode = Some("ONLINE".to_string());
        b.iter(|| plan(black_box(&upfront), black_box(&context)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_plan_steps);
criterion_main!(benches);
