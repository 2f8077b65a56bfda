use crate::core::dimensions::{Allocation, PerConsumer, PerProducer, NUM_PRODUCERS};
use crate::core::problem::{MarketProblem, MaxIterations};
use crate::core::result::ClearingResult;
use log::{debug, info};

/// Price component watched by the convergence test. The stopping rule
/// inspects only the third producer's per-iteration price delta, not a norm
/// over the whole vector; all producers share the loop dynamics, so one
/// settling component is treated as the market settling.
const PRICE_WATCH_INDEX: usize = 2;

/// Working state of one solve. Rebuilt from scratch on every invocation;
/// nothing carries over between calls.
struct SolverState {
    price: PerProducer,
    production: PerProducer,
    allocation: Allocation,
    /// Multiplier on each consumer's aggregate lower demand bound.
    u_min: PerConsumer,
    /// Multiplier on each consumer's aggregate upper demand bound.
    u_max: PerConsumer,
    /// Column sums of `allocation`, fed back to the producer update.
    demand_by_producer: PerProducer,
    /// Row sums of `allocation`, fed back to the dual update.
    demand_by_consumer: PerConsumer,
}

impl SolverState {
    /// Seed every variable from the problem constants.
    ///
    /// Prices start at each producer's marginal cost at minimum output, so
    /// initial production lands exactly on `p_min`. Bound multipliers start
    /// at zero, and the allocation is the bounded demand at those prices.
    fn initialize(problem: &MarketProblem) -> Self {
        let mut price = PerProducer::zeros();
        let mut production = PerProducer::zeros();
        for (i, producer) in problem.producers.iter().enumerate() {
            price[i] = producer.marginal_cost(producer.p_min);
            production[i] = producer.output_at(price[i]);
        }

        let u_min = PerConsumer::zeros();
        let u_max = PerConsumer::zeros();
        let mut allocation = Allocation::zeros();
        for (j, consumer) in problem.consumers.iter().enumerate() {
            for i in 0..NUM_PRODUCERS {
                allocation[(j, i)] = consumer.bounded_demand(price[i], u_min[j], u_max[j]);
            }
        }

        let mut state = Self {
            price,
            production,
            allocation,
            u_min,
            u_max,
            demand_by_producer: PerProducer::zeros(),
            demand_by_consumer: PerConsumer::zeros(),
        };
        state.refresh_aggregates();
        state
    }

    /// Producer pass: step each shadow price against its supply-demand
    /// imbalance, project to non-negative, re-derive production from the new
    /// price. Returns the total generation cost at the new outputs.
    fn update_prices_and_production(&mut self, problem: &MarketProblem) -> f64 {
        let mut total_cost = 0.0;
        for (i, producer) in problem.producers.iter().enumerate() {
            let imbalance = self.production[i] - self.demand_by_producer[i];
            self.price[i] = (self.price[i] - problem.step_price * imbalance).max(0.0);
            self.production[i] = producer.output_at(self.price[i]);
            total_cost += producer.cost(self.production[i]);
        }
        total_cost
    }

    /// Consumer pass: projected subgradient step on both bound multipliers
    /// against the previous iteration's aggregate demand, then rebuild the
    /// consumer's allocation row from the already-updated prices. Returns the
    /// total utility at the new allocations.
    ///
    /// Ordering matters: this must run after the full producer pass of the
    /// same iteration, and it must read `demand_by_consumer` as left by the
    /// previous iteration.
    fn update_demands_and_duals(&mut self, problem: &MarketProblem) -> f64 {
        let mut total_utility = 0.0;
        for (j, consumer) in problem.consumers.iter().enumerate() {
            let served = self.demand_by_consumer[j];
            self.u_min[j] = (self.u_min[j] + problem.step_dual * (consumer.q_min - served)).max(0.0);
            self.u_max[j] = (self.u_max[j] + problem.step_dual * (served - consumer.q_max)).max(0.0);

            for i in 0..NUM_PRODUCERS {
                let q = consumer.bounded_demand(self.price[i], self.u_min[j], self.u_max[j]);
                self.allocation[(j, i)] = q;
                total_utility += consumer.utility(q);
            }
        }
        total_utility
    }

    /// Recompute both aggregate views of the allocation for the next
    /// iteration's feedback.
    fn refresh_aggregates(&mut self) {
        self.demand_by_producer = self.allocation.column_sums();
        self.demand_by_consumer = self.allocation.row_sums();
    }
}

/// The market-clearing engine.
///
/// A pure function of (problem, iteration cap): no I/O, no shared state,
/// single-threaded. Persistence of the result is the caller's concern.
pub struct ClearingEngine;

impl ClearingEngine {
    /// Run the iterative clearing algorithm.
    ///
    /// # Algorithm
    ///
    /// 1. Initialize prices at marginal cost of minimum output, production on
    ///    its lower bound, duals at zero, allocation from bounded demand.
    /// 2. Each iteration, in order: update all producer prices and outputs,
    ///    then all consumer duals and allocation rows, then the aggregate
    ///    demand sums and the objective.
    /// 3. Stop once the watched price component moves by at most `epsilon`
    ///    in one iteration, or when the cap is exhausted.
    ///
    /// `iterations_performed` in the returned record is the 1-based count of
    /// completed iterations.
    pub fn solve(problem: &MarketProblem, max_iterations: MaxIterations) -> ClearingResult {
        let mut state = SolverState::initialize(problem);
        let mut objective = 0.0;
        let mut iterations_performed = 0;

        for k in 0..max_iterations.get() {
            iterations_performed = k + 1;
            let watched_at_start = state.price[PRICE_WATCH_INDEX];

            let total_cost = state.update_prices_and_production(problem);
            let total_utility = state.update_demands_and_duals(problem);
            state.refresh_aggregates();
            objective = total_utility - total_cost;

            let delta = (state.price[PRICE_WATCH_INDEX] - watched_at_start).abs();
            debug!(
                "iteration {}: objective {:.6}, watched price delta {:.3e}",
                iterations_performed, objective, delta
            );
            if delta <= problem.epsilon {
                info!(
                    "converged after {} iterations (price delta {:.3e} <= {:.1e})",
                    iterations_performed, delta, problem.epsilon
                );
                break;
            }
        }

        ClearingResult {
            objective,
            production: state.production,
            allocation: state.allocation,
            price: state.price,
            iterations_performed,
        }
    }
}
