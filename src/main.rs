//! gridclear CLI
//!
//! Run the market-clearing solve from the command line and keep the latest
//! result in a file-backed ledger.
//!
//! # Usage
//!
//! ```bash
//! # Clear the reference market, up to 1000 iterations
//! gridclear solve
//!
//! # Tighter cap, JSON output
//! gridclear solve --max-iterations 50 --format json
//!
//! # Read back the latest stored result
//! gridclear query
//!
//! # Seed the ledger with a zero placeholder
//! gridclear init
//! ```

use gridclear::core::problem::MarketProblem;
use gridclear::core::result::ClearingResult;
use gridclear::store::ledger::ResultLedger;
use gridclear::store::FileStore;
use std::process;

const DEFAULT_STORE_DIR: &str = "./gridclear-ledger";
const DEFAULT_MAX_ITERATIONS: &str = "1000";

fn print_usage() {
    eprintln!(
        r#"gridclear — iterative market clearing for a fixed electricity market

USAGE:
    gridclear <COMMAND> [OPTIONS]

COMMANDS:
    solve       Run the clearing solve and record the result
    query       Print the most recently recorded result
    init        Seed the ledger with a zero placeholder (idempotent)
    help        Show this message

OPTIONS (solve):
    --max-iterations <N>  Iteration cap, positive integer (default: 1000)
    --store <DIR>         Ledger directory (default: ./gridclear-ledger)
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (query):
    --store <DIR>         Ledger directory (default: ./gridclear-ledger)
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (init):
    --store <DIR>         Ledger directory (default: ./gridclear-ledger)

EXAMPLES:
    gridclear solve
    gridclear solve --max-iterations 200 --format json
    gridclear query --store /var/lib/gridclear
    gridclear init"#
    );
}

fn print_result(result: &ClearingResult, format: &str) {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(result).unwrap());
    } else {
        println!("{}", result);
    }
}

fn flag_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    args.get(*i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires a value", flag);
        process::exit(1);
    })
}

fn cmd_solve(args: &[String]) {
    let mut max_iterations = DEFAULT_MAX_ITERATIONS.to_string();
    let mut store_dir = DEFAULT_STORE_DIR.to_string();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--max-iterations" => max_iterations = flag_value(args, &mut i, "--max-iterations"),
            "--store" => store_dir = flag_value(args, &mut i, "--store"),
            "--format" => format = flag_value(args, &mut i, "--format"),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut ledger = ResultLedger::new(FileStore::new(&store_dir));
    let problem = MarketProblem::reference();

    match ledger.solve_and_record(&problem, &max_iterations) {
        Ok(result) => print_result(&result, &format),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_query(args: &[String]) {
    let mut store_dir = DEFAULT_STORE_DIR.to_string();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--store" => store_dir = flag_value(args, &mut i, "--store"),
            "--format" => format = flag_value(args, &mut i, "--format"),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = ResultLedger::new(FileStore::new(&store_dir));
    match ledger.latest() {
        Ok(result) => print_result(&result, &format),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_init(args: &[String]) {
    let mut store_dir = DEFAULT_STORE_DIR.to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--store" => store_dir = flag_value(args, &mut i, "--store"),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut ledger = ResultLedger::new(FileStore::new(&store_dir));
    match ledger.init() {
        Ok(true) => println!("Ledger seeded at {}", store_dir),
        Ok(false) => println!("Ledger already initialized at {}", store_dir),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "solve" => cmd_solve(rest),
        "query" => cmd_query(rest),
        "init" => cmd_init(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
