use crate::support::{print_json, print_map, read_map_or_exit};
use graft_kernel::meet;

pub fn run(left: String, right: String, json_output: bool) {
    let f = read_map_or_exit(&left);
    let g = read_map_or_exit(&right);
    if f.shape() != g.shape() {
        eprintln!(
            "error: meet needs maps of one shape, got {} and {}",
            f.shape(),
            g.shape()
        );
        std::process::exit(1);
    }
    let m = meet(&f, &g);

    if json_output {
        print_json(&m);
    } else {
        print_map("graft meet", &m);
    }
}
