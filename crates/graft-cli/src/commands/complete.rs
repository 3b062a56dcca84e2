use crate::support::{or_exit, parse_vector_or_exit, print_json, print_map, read_map_or_exit};
use graft_kernel::{Colimit, Vector, maximal_extension, zero_extensions};
use serde_json::json;

pub fn run(map: String, eval: Option<String>, probe_depth: usize, json_output: bool) {
    let f = read_map_or_exit(&map);

    if let Some(point) = eval {
        let x = parse_vector_or_exit(&point, "--eval");
        let unfolding = zero_extensions(&f, probe_depth);
        let value = or_exit(Colimit::new(&unfolding).eval(&x), "evaluation failed");
        if json_output {
            print_json(&json!({ "point": x, "value": value, "probeDepth": probe_depth }));
        } else {
            println!("graft complete");
            println!("  {x} ↦ {value}");
        }
        return;
    }

    let output = f.shape().output;
    let chain = maximal_extension(&f, |_| Vector::zero(output));
    let total = chain.last();
    tracing::info!(steps = chain.len() - 1, "completed by zero");

    if json_output {
        print_json(total);
    } else {
        print_map(&format!("graft complete ({} steps)", chain.len() - 1), total);
    }
}
