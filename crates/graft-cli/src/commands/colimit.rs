use crate::support::{Map, or_exit, parse_vector_or_exit, print_json, print_map, read_map_or_exit};
use graft_kernel::{
    Chain, Colimit, Directed, Family, Rational, Search, chain_colimit, directed_colimit,
};
use serde_json::json;

pub struct Args {
    pub maps: Vec<String>,
    pub chain: bool,
    pub search: Search,
    pub eval: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let members: Vec<Map> = args.maps.iter().map(|p| read_map_or_exit(p)).collect();

    if args.chain {
        let chain = or_exit(Chain::new(members), "invalid chain").with_search(args.search);
        match &args.eval {
            Some(point) => evaluate(&chain, point, args.json),
            None => report(&chain_colimit(&chain), "graft colimit (chain)", args.json),
        }
    } else {
        let family = or_exit(Directed::new(members), "invalid family");
        match &args.eval {
            Some(point) => evaluate(&family, point, args.json),
            None => report(&directed_colimit(&family), "graft colimit", args.json),
        }
    }
}

fn report(colimit: &Map, title: &str, json_output: bool) {
    if json_output {
        print_json(colimit);
    } else {
        print_map(title, colimit);
    }
}

fn evaluate<D: Family<Rational>>(family: &D, point: &str, json_output: bool) {
    let x = parse_vector_or_exit(point, "--eval");
    let value = or_exit(Colimit::new(family).eval(&x), "evaluation failed");
    if json_output {
        print_json(&json!({ "point": x, "value": value }));
    } else {
        println!("graft colimit");
        println!("  {x} ↦ {value}");
    }
}
