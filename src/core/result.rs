use crate::core::dimensions::{Allocation, PerProducer, NUM_CONSUMERS, NUM_PRODUCERS};
use serde::{Deserialize, Serialize};

/// The outcome of one clearing run.
///
/// This is the only externally visible artifact of a solve. It is computed
/// fresh on every invocation and overwritten into the result store under a
/// single well-known key — no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingResult {
    /// Net welfare at the final iteration: total utility minus total cost.
    pub objective: f64,
    /// Cleared output per producer, within each producer's box.
    pub production: PerProducer,
    /// Consumption allocation: rows are consumers, columns are producers.
    pub allocation: Allocation,
    /// Final shadow price per producer.
    pub price: PerProducer,
    /// 1-based index of the last completed iteration. Equals the requested
    /// cap exactly when convergence was not reached within it.
    pub iterations_performed: u32,
}

impl ClearingResult {
    /// All-zero record used to seed the ledger before any solve has run.
    /// Distinguishable from a real result by `iterations_performed == 0`.
    pub fn placeholder() -> Self {
        Self {
            objective: 0.0,
            production: PerProducer::zeros(),
            allocation: Allocation::zeros(),
            price: PerProducer::zeros(),
            iterations_performed: 0,
        }
    }
}

impl std::fmt::Display for ClearingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Clearing Result ===")?;
        writeln!(f, "Objective (net welfare): {:.4}", self.objective)?;
        writeln!(f, "Iterations performed:    {}", self.iterations_performed)?;

        writeln!(f, "\nProducers:")?;
        for i in 0..NUM_PRODUCERS {
            writeln!(
                f,
                "  G{}: production {:8.3}  price {:7.4}",
                i, self.production[i], self.price[i]
            )?;
        }

        writeln!(f, "\nConsumers (allocation per producer):")?;
        for j in 0..NUM_CONSUMERS {
            let row = self.allocation.row(j);
            let total: f64 = row.iter().sum();
            write!(f, "  L{}:", j)?;
            for q in row {
                write!(f, " {:8.3}", q)?;
            }
            writeln!(f, "  | total {:8.3}", total)?;
        }
        Ok(())
    }
}
