use crate::support::{or_exit, parse_vector_or_exit, print_json, print_map, read_map_or_exit};
use graft_kernel::try_extend_by_vector;

pub fn run(map: String, x: String, y: String, json_output: bool) {
    let f = read_map_or_exit(&map);
    let x = parse_vector_or_exit(&x, "--x");
    let y = parse_vector_or_exit(&y, "--y");
    let extended = or_exit(try_extend_by_vector(&f, x, y), "extend failed");

    if json_output {
        print_json(&extended);
    } else {
        print_map("graft extend", &extended);
    }
}
