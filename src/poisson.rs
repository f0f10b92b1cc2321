//! Poisson counts: pmf and random variates.

use tinyrand::Rand;

/// Probability of observing `k` events at rate `lambda`. Computed in recurrence
/// form, `p(k) = p(k-1) · λ/k`, which stays finite where explicit factorials
/// would overflow.
pub fn pmf(k: u64, lambda: f64) -> f64 {
    debug_assert!(lambda >= 0.0, "invalid rate {lambda}");
    let mut prob = f64::exp(-lambda);
    for i in 1..=k {
        prob *= lambda / i as f64;
    }
    prob
}

/// Draws one Poisson variate at rate `lambda` by walking the CDF until it
/// crosses a uniform draw. The walk is capped well past the distribution's
/// mass to bound it even when the tail probabilities underflow.
pub fn draw(lambda: f64, rand: &mut impl Rand) -> u64 {
    debug_assert!(lambda >= 0.0, "invalid rate {lambda}");
    let cap = (lambda * 20.0).ceil() as u64 + 100;
    let uniform = random_f64(rand);
    let mut k = 0;
    let mut prob = f64::exp(-lambda);
    let mut cumulative = prob;
    while uniform > cumulative && k < cap {
        k += 1;
        prob *= lambda / k as f64;
        cumulative += prob;
    }
    k
}

#[inline]
pub(crate) fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}
