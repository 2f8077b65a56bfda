use gridclear::core::dimensions::{NUM_CONSUMERS, NUM_PRODUCERS};
use gridclear::core::problem::{ConsumerParams, MarketProblem, MaxIterations, ProducerParams};
use gridclear::solver::engine::ClearingEngine;
use proptest::prelude::*;

/// A producer with a positive quadratic coefficient and a consistent box.
fn arb_producer() -> impl Strategy<Value = ProducerParams> {
    (0.001f64..0.05, 0.5f64..5.0, 1.0f64..50.0, 10.0f64..400.0).prop_map(
        |(alpha, beta, p_min, span)| ProducerParams {
            alpha,
            beta,
            p_min,
            p_max: p_min + span,
        },
    )
}

/// A consumer with a positive satiation rate and consistent aggregate bounds.
fn arb_consumer() -> impl Strategy<Value = ConsumerParams> {
    (0.01f64..0.2, 1.0f64..10.0, 1.0f64..100.0, 1.0f64..120.0).prop_map(
        |(theta, beta, q_min, span)| ConsumerParams {
            theta,
            beta,
            q_min,
            q_max: q_min + span,
        },
    )
}

fn arb_problem() -> impl Strategy<Value = MarketProblem> {
    (
        proptest::array::uniform3(arb_producer()),
        proptest::array::uniform6(arb_consumer()),
        0.0005f64..0.02,
        0.00001f64..0.001,
    )
        .prop_map(|(producers, consumers, step_price, step_dual)| MarketProblem {
            producers,
            consumers,
            step_price,
            step_dual,
            epsilon: 0.00009,
        })
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Production always lies inside each producer's box.
    //
    // Output is re-derived from price through the clamped inverse marginal
    // cost every iteration, so no step size or curve shape can push it out.
    // ===================================================================
    #[test]
    fn production_stays_in_box(problem in arb_problem(), cap in 1u32..200) {
        let result = ClearingEngine::solve(&problem, MaxIterations::new(cap).unwrap());
        for (i, producer) in problem.producers.iter().enumerate() {
            prop_assert!(result.production[i] >= producer.p_min);
            prop_assert!(result.production[i] <= producer.p_max);
        }
    }

    // ===================================================================
    // INVARIANT 2: Prices never go negative.
    //
    // The price update is a projected subgradient step: any step below
    // zero is projected back onto the feasible half-line.
    // ===================================================================
    #[test]
    fn prices_stay_non_negative(problem in arb_problem(), cap in 1u32..200) {
        let result = ClearingEngine::solve(&problem, MaxIterations::new(cap).unwrap());
        for i in 0..NUM_PRODUCERS {
            prop_assert!(result.price[i] >= 0.0);
        }
    }

    // ===================================================================
    // INVARIANT 3: Every allocation entry respects the bound-adjustment
    // rule: never a raw negative value (negatives become q_min), never
    // above the consumer's aggregate cap.
    // ===================================================================
    #[test]
    fn allocations_respect_bound_adjustment(problem in arb_problem(), cap in 1u32..200) {
        let result = ClearingEngine::solve(&problem, MaxIterations::new(cap).unwrap());
        for (j, consumer) in problem.consumers.iter().enumerate() {
            for i in 0..NUM_PRODUCERS {
                let q = result.allocation[(j, i)];
                prop_assert!(q >= 0.0, "allocation[{}][{}] = {} is negative", j, i, q);
                prop_assert!(
                    q <= consumer.q_max,
                    "allocation[{}][{}] = {} exceeds q_max = {}",
                    j, i, q, consumer.q_max
                );
            }
        }
    }

    // ===================================================================
    // INVARIANT 4: The iteration count is bounded by the cap, and a solve
    // that used fewer iterations than the cap must have converged — so
    // re-running with the cap set at that count reproduces the record.
    // ===================================================================
    #[test]
    fn iteration_count_bounded_and_prefix_idempotent(problem in arb_problem(), cap in 1u32..200) {
        let result = ClearingEngine::solve(&problem, MaxIterations::new(cap).unwrap());
        prop_assert!(result.iterations_performed >= 1);
        prop_assert!(result.iterations_performed <= cap);

        if result.iterations_performed < cap {
            let replay = ClearingEngine::solve(
                &problem,
                MaxIterations::new(result.iterations_performed).unwrap(),
            );
            prop_assert_eq!(replay, result);
        }
    }

    // ===================================================================
    // INVARIANT 5: Aggregate views of the allocation are consistent — the
    // producers' demand columns and the consumers' demand rows sum to the
    // same total.
    // ===================================================================
    #[test]
    fn allocation_aggregates_are_consistent(problem in arb_problem(), cap in 1u32..100) {
        let result = ClearingEngine::solve(&problem, MaxIterations::new(cap).unwrap());
        let by_producer = result.allocation.column_sums().sum();
        let by_consumer = result.allocation.row_sums().sum();
        prop_assert!((by_producer - by_consumer).abs() < 1e-9 * (1.0 + by_producer.abs()));
    }

    // ===================================================================
    // INVARIANT 6: The reference market record survives any cap at or past
    // its convergence point unchanged.
    // ===================================================================
    #[test]
    fn reference_market_record_is_stable_past_convergence(extra in 0u32..500) {
        let problem = MarketProblem::reference();
        let settled = ClearingEngine::solve(&problem, MaxIterations::new(1000).unwrap());
        prop_assume!(settled.iterations_performed < 1000);

        let replay = ClearingEngine::solve(
            &problem,
            MaxIterations::new(settled.iterations_performed + extra).unwrap(),
        );
        prop_assert_eq!(replay, settled);
    }
}

#[test]
fn objective_is_finite_for_the_reference_market() {
    let result = ClearingEngine::solve(
        &MarketProblem::reference(),
        MaxIterations::new(1000).unwrap(),
    );
    assert!(result.objective.is_finite());
    assert_eq!(
        result.allocation.row_sums().as_array().len(),
        NUM_CONSUMERS
    );
}
