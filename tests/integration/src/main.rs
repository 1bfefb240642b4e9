//! Integration test harness
//!
//! Runs each integration test target in turn and prints a summary.
//!
//! # Usage
//!
//! Run all tests:
//! ```
//! cargo run -p integration-tests
//! ```
//!
//! Run one target:
//! ```
//! cargo test -p integration-tests --test lifecycle_tests
//! cargo test -p integration-tests --test activation_tests
//! cargo test -p integration-tests --test stress_tests
//! ```
//!
//! Run with increased logging:
//! ```
//! RUST_LOG=com_runtime=trace cargo test -p integration-tests --test lifecycle_tests
//! ```

use std::process::Command;
use std::time::{Duration, Instant};

/// Test category
#[derive(Debug, Clone)]
struct TestCategory {
    name: &'static str,
    description: &'static str,
    test_name: &'static str,
}

const TEST_CATEGORIES: &[TestCategory] = &[
    TestCategory {
        name: "Lifecycle Tests",
        description: "Reference counting, negotiation and destruction",
        test_name: "lifecycle_tests",
    },
    TestCategory {
        name: "Activation Tests",
        description: "Registry lookup, class factories and the status-code protocol",
        test_name: "activation_tests",
    },
    TestCategory {
        name: "Stress Tests",
        description: "Concurrent acquire/release and activation",
        test_name: "stress_tests",
    },
];

fn run_test_category(category: &TestCategory) -> (bool, Duration, String) {
    println!("\n{}", "=".repeat(80));
    println!("Running: {} - {}", category.name, category.description);
    println!("{}", "=".repeat(80));

    let start = Instant::now();
    let output = Command::new("cargo")
        .args(["test", "-p", "integration-tests", "--test", category.test_name])
        .output();
    let duration = start.elapsed();

    match output {
        Ok(output) => {
            print!("{}", String::from_utf8_lossy(&output.stdout));
            eprint!("{}", String::from_utf8_lossy(&output.stderr));

            let success = output.status.success();
            let summary = if success {
                "PASSED".to_string()
            } else {
                format!("FAILED (exit code: {:?})", output.status.code())
            };
            (success, duration, summary)
        }
        Err(e) => (false, duration, format!("Failed to execute: {}", e)),
    }
}

fn main() {
    let total_start = Instant::now();
    let results: Vec<_> = TEST_CATEGORIES
        .iter()
        .map(|category| (category.name, run_test_category(category)))
        .collect();

    println!("\n{}", "=".repeat(80));
    println!("FINAL SUMMARY ({:?})", total_start.elapsed());
    println!("{}", "=".repeat(80));
    println!("{:<30} {:<10} {:<15} Details", "Category", "Status", "Duration");
    println!("{}", "-".repeat(80));

    let mut failed = 0;
    for (name, (success, duration, summary)) in &results {
        if !success {
            failed += 1;
        }
        let status = if *success { "PASS" } else { "FAIL" };
        println!("{:<30} {:<10} {:<15?} {}", name, status, duration, summary);
    }

    if failed > 0 {
        println!("\n{} of {} categories failed", failed, results.len());
        std::process::exit(1);
    }
    println!("\nAll tests passed!");
}
