use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of producers in the market. Fixed problem constant.
pub const NUM_PRODUCERS: usize = 3;

/// Number of consumers in the market. Fixed problem constant.
pub const NUM_CONSUMERS: usize = 6;

/// A quantity indexed by producer.
///
/// The producer and consumer sides of the market have different, fixed
/// cardinalities. Keeping them in distinct container types means a price
/// vector can never be handed to code expecting a per-consumer quantity.
///
/// # Examples
///
/// ```
/// use gridclear::core::dimensions::PerProducer;
///
/// let prices = PerProducer::new([2.41, 2.57, 2.49]);
/// assert_eq!(prices[1], 2.57);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerProducer([f64; NUM_PRODUCERS]);

impl PerProducer {
    pub fn new(values: [f64; NUM_PRODUCERS]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; NUM_PRODUCERS])
    }

    pub fn as_array(&self) -> &[f64; NUM_PRODUCERS] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Index<usize> for PerProducer {
    type Output = f64;

    fn index(&self, producer: usize) -> &f64 {
        &self.0[producer]
    }
}

impl IndexMut<usize> for PerProducer {
    fn index_mut(&mut self, producer: usize) -> &mut f64 {
        &mut self.0[producer]
    }
}

impl From<[f64; NUM_PRODUCERS]> for PerProducer {
    fn from(values: [f64; NUM_PRODUCERS]) -> Self {
        Self(values)
    }
}

/// A quantity indexed by consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerConsumer([f64; NUM_CONSUMERS]);

impl PerConsumer {
    pub fn new(values: [f64; NUM_CONSUMERS]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; NUM_CONSUMERS])
    }

    pub fn as_array(&self) -> &[f64; NUM_CONSUMERS] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Index<usize> for PerConsumer {
    type Output = f64;

    fn index(&self, consumer: usize) -> &f64 {
        &self.0[consumer]
    }
}

impl IndexMut<usize> for PerConsumer {
    fn index_mut(&mut self, consumer: usize) -> &mut f64 {
        &mut self.0[consumer]
    }
}

impl From<[f64; NUM_CONSUMERS]> for PerConsumer {
    fn from(values: [f64; NUM_CONSUMERS]) -> Self {
        Self(values)
    }
}

/// The consumption allocation matrix: rows are consumers, columns are
/// producers. `allocation[(j, i)]` is the quantity consumer `j` buys from
/// producer `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation([[f64; NUM_PRODUCERS]; NUM_CONSUMERS]);

impl Allocation {
    pub fn new(rows: [[f64; NUM_PRODUCERS]; NUM_CONSUMERS]) -> Self {
        Self(rows)
    }

    pub fn zeros() -> Self {
        Self([[0.0; NUM_PRODUCERS]; NUM_CONSUMERS])
    }

    /// One consumer's purchases across all producers.
    pub fn row(&self, consumer: usize) -> &[f64; NUM_PRODUCERS] {
        &self.0[consumer]
    }

    /// Aggregate demand directed at each producer (column sums).
    pub fn column_sums(&self) -> PerProducer {
        let mut sums = PerProducer::zeros();
        for row in &self.0 {
            for (i, q) in row.iter().enumerate() {
                sums[i] += q;
            }
        }
        sums
    }

    /// Aggregate demand of each consumer (row sums).
    pub fn row_sums(&self) -> PerConsumer {
        let mut sums = PerConsumer::zeros();
        for (j, row) in self.0.iter().enumerate() {
            sums[j] = row.iter().sum();
        }
        sums
    }
}

impl Index<(usize, usize)> for Allocation {
    type Output = f64;

    fn index(&self, (consumer, producer): (usize, usize)) -> &f64 {
        &self.0[consumer][producer]
    }
}

impl IndexMut<(usize, usize)> for Allocation {
    fn index_mut(&mut self, (consumer, producer): (usize, usize)) -> &mut f64 {
        &mut self.0[consumer][producer]
    }
}
