use crate::support::{or_exit, print_json, print_map, read_map_or_exit};
use graft_kernel::{Strategy, try_join_with};

pub fn run(left: String, right: String, strategy: Strategy, json_output: bool) {
    let f = read_map_or_exit(&left);
    let g = read_map_or_exit(&right);
    let joined = or_exit(try_join_with(&f, &g, &strategy), "join failed");

    if json_output {
        print_json(&joined);
    } else {
        print_map(&format!("graft join ({strategy})"), &joined);
    }
}
