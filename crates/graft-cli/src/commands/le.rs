use crate::support::{print_json, read_map_or_exit};
use graft_kernel::le;
use serde_json::json;

pub fn run(left: String, right: String, json_output: bool) {
    let f = read_map_or_exit(&left);
    let g = read_map_or_exit(&right);
    let below = le(&f, &g);
    let above = le(&g, &f);

    if json_output {
        print_json(&json!({
            "le": below,
            "ge": above,
            "equal": below && above,
        }));
    } else {
        let relation = match (below, above) {
            (true, true) => "equal",
            (true, false) => "left is extended by right",
            (false, true) => "right is extended by left",
            (false, false) => "incomparable",
        };
        println!("graft le");
        println!("  Left: {f}");
        println!("  Right: {g}");
        println!("  Result: {relation}");
    }
}
