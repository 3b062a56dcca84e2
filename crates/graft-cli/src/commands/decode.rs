use crate::support::{or_exit, print_json, print_map, read_json_file_or_exit};
use graft_kernel::{Graph, Rational};

pub fn run(graph: String, json_output: bool) {
    let graph: Graph<Rational> = read_json_file_or_exit(&graph, "graph");
    let f = or_exit(graph.decode(), "decode failed");

    if json_output {
        print_json(&f);
    } else {
        print_map("graft decode", &f);
    }
}
