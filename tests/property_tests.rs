use chrono::NaiveDate;
use order_pricing::application::pricing::OrderPricingEngine;
use order_pricing::domain::order::{LineItem, OrderAdjustments};
use order_pricing::domain::payment::{PaymentConfig, PaymentMethod};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn random_amount(rng: &mut StdRng, max_cents: i64) -> Decimal {
    Decimal::new(rng.gen_range(0..=max_cents), 2)
}

fn random_order(rng: &mut StdRng) -> (Vec<LineItem>, OrderAdjustments) {
    let count = rng.gen_range(1..=25);
    let items = (0..count)
        .map(|i| {
            LineItem::new(
                format!("p-{}", i),
                format!("SKU-{:03}", rng.gen_range(0..1000)),
                rng.gen_range(1..=50),
                random_amount(rng, 100_000),
            )
        })
        .collect();
    let adjustments = OrderAdjustments::new(
        random_amount(rng, 20_000),
        random_amount(rng, 10_000),
        random_amount(rng, 5_000),
    );
    (items, adjustments)
}

#[test]
fn test_subtotals_always_add_up_to_grand_total() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let (items, adjustments) = random_order(&mut rng);
        let totals = OrderPricingEngine::compute_totals(&items, &adjustments);

        let sum: Decimal = totals.lines.iter().map(|l| l.display_subtotal).sum();
        assert!(
            (sum - totals.grand_total).abs() < dec!(0.000001),
            "sum {} != grand total {}",
            sum,
            totals.grand_total
        );
    }
}

#[test]
fn test_equal_quantities_get_equal_allocations() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let (mut items, adjustments) = random_order(&mut rng);
        let quantity = items[0].quantity;
        items.push(LineItem::new(
            "twin",
            "ZZZ",
            quantity,
            random_amount(&mut rng, 1_000_000),
        ));

        let allocated =
            OrderPricingEngine::compute_totals(&items, &adjustments).allocated_cost_for_item();
        assert_eq!(allocated[0], allocated[allocated.len() - 1]);
    }
}

#[test]
fn test_preview_matches_resubmission() {
    let mut rng = StdRng::seed_from_u64(23);
    let order_date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let payment = PaymentConfig::installments(PaymentMethod::Pix, "0,28,56");

    for _ in 0..100 {
        let (items, adjustments) = random_order(&mut rng);
        let preview = OrderPricingEngine::price_order(&items, &adjustments, &payment, order_date);
        let submitted =
            OrderPricingEngine::price_order(&items, &adjustments, &payment, order_date);

        assert_eq!(preview, submitted);
        assert!(preview.items.windows(2).all(|w| w[0].sku <= w[1].sku));
        assert_eq!(preview.installments.len(), 3);
    }
}
