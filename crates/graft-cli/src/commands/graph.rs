use crate::support::{print_json, read_map_or_exit};
use graft_kernel::Graph;

pub fn run(map: String, json_output: bool) {
    let f = read_map_or_exit(&map);
    let graph = Graph::encode(&f);

    if json_output {
        print_json(&graph);
    } else {
        println!("graft graph");
        println!("  Shape: {}", graph.shape());
        println!("  Graph: {}", graph.space());
        println!("  Range: {}", graph.range());
    }
}
