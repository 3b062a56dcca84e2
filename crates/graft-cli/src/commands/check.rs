use crate::support::{or_exit, print_json, read_json_file_or_exit};
use graft_kernel::{LawCheck, LawResult, Rational, run_law_check};
use serde_json::Value;

pub fn run(case: String, json_output: bool) {
    let payload: Value = read_json_file_or_exit(&case, "law check");
    // Accept both a bare check and a fixture case wrapping one.
    let check_json = payload.get("check").unwrap_or(&payload);
    let check = or_exit(LawCheck::<Rational>::from_fixture(check_json), "invalid check");
    let result = or_exit(run_law_check(&check), "law check failed");

    if json_output {
        print_json(&result);
    } else {
        print_human_summary(&result);
    }

    if !result.is_accepted() {
        std::process::exit(1);
    }
}

fn print_human_summary(result: &LawResult) {
    println!("graft check");
    println!("  Kind: {}", result.kind);
    println!("  Result: {}", result.result);
    let checked: Vec<&str> = result.checked.iter().map(|law| law.as_str()).collect();
    println!("  Laws: {}", checked.join(", "));
    if !result.failures.is_empty() {
        println!("  Failures:");
        for failure in &result.failures {
            println!(
                "    - {} {:?}: {} [{}]",
                failure.law.as_str(),
                failure.members,
                failure.description,
                failure.witness_id
            );
        }
    }
}
