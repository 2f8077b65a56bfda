use crate::core::dimensions::{NUM_CONSUMERS, NUM_PRODUCERS};
use crate::core::error::ClearingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cost-side parameters of one producer.
///
/// Generation cost is quadratic: `cost(p) = alpha·p² + beta·p`, with output
/// bounded to `[p_min, p_max]`. `alpha` must be positive — the inverse
/// marginal cost divides by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProducerParams {
    /// Quadratic cost coefficient.
    pub alpha: f64,
    /// Linear cost coefficient.
    pub beta: f64,
    /// Minimum feasible output.
    pub p_min: f64,
    /// Maximum feasible output.
    pub p_max: f64,
}

impl ProducerParams {
    /// Generation cost at output level `p`.
    pub fn cost(&self, p: f64) -> f64 {
        self.alpha * p * p + self.beta * p
    }

    /// Marginal cost at output level `p`.
    pub fn marginal_cost(&self, p: f64) -> f64 {
        2.0 * self.alpha * p + self.beta
    }

    /// Profit-maximizing output at the given price, boxed to the feasible
    /// range. Inverts the marginal cost curve.
    pub fn output_at(&self, price: f64) -> f64 {
        ((price - self.beta) / (2.0 * self.alpha)).clamp(self.p_min, self.p_max)
    }
}

/// Demand-side parameters of one consumer.
///
/// Utility is quadratic and concave: `utility(q) = beta·q − 0.5·theta·q²`.
/// `q_min` and `q_max` bound the consumer's *aggregate* demand across all
/// producers; the dual multipliers for those bounds feed back into the
/// per-producer demand. `theta` must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumerParams {
    /// Quadratic utility coefficient (satiation rate).
    pub theta: f64,
    /// Linear utility coefficient (marginal utility at zero consumption).
    pub beta: f64,
    /// Minimum aggregate demand.
    pub q_min: f64,
    /// Maximum aggregate demand.
    pub q_max: f64,
}

impl ConsumerParams {
    /// Utility derived from consuming quantity `q`.
    pub fn utility(&self, q: f64) -> f64 {
        self.beta * q - 0.5 * self.theta * q * q
    }

    /// Unconstrained utility-maximizing quantity at the given price and
    /// bound multipliers.
    pub fn raw_demand(&self, price: f64, u_min: f64, u_max: f64) -> f64 {
        (self.beta + u_min - u_max - price) / self.theta
    }

    /// Demand after the bound-adjustment rule.
    ///
    /// The rule is asymmetric: a negative quantity is replaced by the
    /// aggregate lower bound `q_min` (not clamped to zero), while a quantity
    /// above `q_max` is capped at `q_max`. Every stored allocation entry goes
    /// through this rule.
    pub fn bounded_demand(&self, price: f64, u_min: f64, u_max: f64) -> f64 {
        let q = self.raw_demand(price, u_min, u_max);
        if q < 0.0 {
            self.q_min
        } else if q > self.q_max {
            self.q_max
        } else {
            q
        }
    }
}

/// The full market description: every producer's cost curve and box, every
/// consumer's utility curve and aggregate-demand bounds, plus the solver's
/// step sizes and convergence tolerance.
///
/// The producer and consumer counts are compile-time constants; a problem
/// instance only varies the curve coefficients and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketProblem {
    pub producers: [ProducerParams; NUM_PRODUCERS],
    pub consumers: [ConsumerParams; NUM_CONSUMERS],
    /// Step size for the shadow-price update.
    pub step_price: f64,
    /// Step size for the demand-bound multiplier update.
    pub step_dual: f64,
    /// Tolerance on the watched price component's per-iteration change.
    pub epsilon: f64,
}

impl MarketProblem {
    /// The reference market: three generators and six loads with the curve
    /// coefficients and bounds of the original grid experiment.
    pub fn reference() -> Self {
        Self {
            producers: [
                ProducerParams { alpha: 0.0080, beta: 2.25, p_min: 10.0, p_max: 350.0 },
                ProducerParams { alpha: 0.0080, beta: 2.25, p_min: 20.0, p_max: 290.0 },
                ProducerParams { alpha: 0.0080, beta: 2.25, p_min: 15.0, p_max: 400.0 },
            ],
            consumers: [
                ConsumerParams { theta: 0.0720, beta: 8.25, q_min: 60.0, q_max: 150.0 },
                ConsumerParams { theta: 0.0720, beta: 8.25, q_min: 50.0, q_max: 100.0 },
                ConsumerParams { theta: 0.0660, beta: 7.90, q_min: 90.0, q_max: 145.0 },
                ConsumerParams { theta: 0.0660, beta: 7.90, q_min: 60.0, q_max: 140.0 },
                ConsumerParams { theta: 0.0700, beta: 7.55, q_min: 50.0, q_max: 150.0 },
                ConsumerParams { theta: 0.0700, beta: 7.55, q_min: 70.0, q_max: 170.0 },
            ],
            step_price: 0.005,
            step_dual: 0.0001,
            epsilon: 0.00009,
        }
    }
}

impl Default for MarketProblem {
    fn default() -> Self {
        Self::reference()
    }
}

/// Validated iteration cap for one solve.
///
/// Construction rejects anything that is not a positive integer, so the
/// solver itself never sees an invalid cap or the raw string form.
///
/// # Examples
///
/// ```
/// use gridclear::core::problem::MaxIterations;
///
/// let cap: MaxIterations = "1000".parse().unwrap();
/// assert_eq!(cap.get(), 1000);
/// assert!("0".parse::<MaxIterations>().is_err());
/// assert!("many".parse::<MaxIterations>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxIterations(u32);

impl MaxIterations {
    pub fn new(cap: u32) -> Result<Self, ClearingError> {
        if cap == 0 {
            return Err(ClearingError::InvalidMaxIterations {
                raw: cap.to_string(),
            });
        }
        Ok(Self(cap))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for MaxIterations {
    type Err = ClearingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClearingError::InvalidMaxIterations { raw: s.to_string() };
        let cap: u32 = s.trim().parse().map_err(|_| invalid())?;
        if cap == 0 {
            return Err(invalid());
        }
        Ok(Self(cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_producer_curve() {
        let gen = ProducerParams { alpha: 0.008, beta: 2.25, p_min: 10.0, p_max: 350.0 };
        assert_relative_eq!(gen.cost(100.0), 0.008 * 10_000.0 + 225.0);
        assert_relative_eq!(gen.marginal_cost(10.0), 2.41);
        // Marginal cost at p_min inverts back to p_min.
        assert_relative_eq!(gen.output_at(gen.marginal_cost(10.0)), 10.0, max_relative = 1e-12);
        // Price below the curve floor boxes to p_min, far above to p_max.
        assert_relative_eq!(gen.output_at(0.0), 10.0);
        assert_relative_eq!(gen.output_at(100.0), 350.0);
    }

    #[test]
    fn test_consumer_bound_adjustment_is_asymmetric() {
        let load = ConsumerParams { theta: 0.072, beta: 8.25, q_min: 60.0, q_max: 150.0 };

        // Price above marginal utility drives raw demand negative; the rule
        // substitutes the aggregate lower bound, not zero.
        assert!(load.raw_demand(9.0, 0.0, 0.0) < 0.0);
        assert_relative_eq!(load.bounded_demand(9.0, 0.0, 0.0), 60.0);

        // Very cheap power overflows the upper bound and is capped.
        assert!(load.raw_demand(-5.0, 0.0, 0.0) > 150.0);
        assert_relative_eq!(load.bounded_demand(-5.0, 0.0, 0.0), 150.0);

        // Interior values pass through untouched.
        let q = load.bounded_demand(2.41, 0.0, 0.0);
        assert_relative_eq!(q, (8.25 - 2.41) / 0.072);
    }

    #[test]
    fn test_max_iterations_parsing() {
        assert_eq!("42".parse::<MaxIterations>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<MaxIterations>().unwrap().get(), 7);
        assert!("0".parse::<MaxIterations>().is_err());
        assert!("-3".parse::<MaxIterations>().is_err());
        assert!("1.5".parse::<MaxIterations>().is_err());
        assert!("".parse::<MaxIterations>().is_err());
        assert!(MaxIterations::new(0).is_err());
    }
}
