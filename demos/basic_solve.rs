//! Basic clearing example.
//!
//! Solves the reference market, records the result in an in-memory ledger,
//! and reads it back — the whole lifecycle of one clearing run.

use gridclear::core::problem::MarketProblem;
use gridclear::store::ledger::ResultLedger;
use gridclear::store::MemoryStore;

fn main() {
    let problem = MarketProblem::reference();
    let mut ledger = ResultLedger::new(MemoryStore::new());

    // Before any solve there is nothing to query.
    match ledger.latest() {
        Err(e) => println!("Before solving: {}\n", e),
        Ok(_) => unreachable!("fresh ledger cannot hold a result"),
    }

    let result = ledger
        .solve_and_record(&problem, "1000")
        .expect("reference market solve");

    println!("{}", result);
    println!(
        "Stored record matches: {}",
        ledger.latest().expect("just recorded") == result
    );
}
