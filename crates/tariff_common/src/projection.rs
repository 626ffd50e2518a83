//! Price projection - the before/after series behind the price impact chart.

/// Dummy base price the tariff is applied to.
pub const BASE_PRICE: f64 = 100.0;

/// One bar in the price impact chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub label: &'static str,
    pub price: f64,
}

/// Project the base price through a tariff rate (percent).
pub fn project(tariff_rate: f64) -> [PricePoint; 2] {
    [
        PricePoint {
            label: "Base Price",
            price: BASE_PRICE,
        },
        PricePoint {
            label: "After Tariff",
            price: BASE_PRICE * (1.0 + tariff_rate / 100.0),
        },
    ]
}

/// Price delta as a percentage of the base price.
pub fn delta_pct(tariff_rate: f64) -> f64 {
    let [base, after] = project(tariff_rate);
    (after.price - base.price) / base.price * 100.0
}
