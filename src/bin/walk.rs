//! an executable generating second order random walks from a csv edge list
//! example usage:
//! walk --csv "ca-GrQc.txt" --length 80 --iterations 10 --return 0.5 --explore 2. --output walks.csv
//! walk --csv "edges.txt" --directed --nodetypes "types.txt" --nodetype 3. --edgetype 0.5 --seed 17 --verbose
//!
//! The edge list has records `src dst [weight [edge_type]]`, the node type file records `node type`.
//! Walks are written one per line, with node names as found in the edge list.

use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use graphwalk::prelude::*;

// decode an optional numeric argument
fn parse_opt<T: FromStr>(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<T>> {
    match matches.value_of(name) {
        Some(str) => match str.parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                log::error!("error parsing {} : {}", name, str);
                Err(anyhow!("error parsing {}", name))
            }
        },
        None => Ok(None),
    }
} // end of parse_opt

fn parse_walk_args(matches: &ArgMatches) -> anyhow::Result<WalksParameters> {
    log::debug!("in parse_walk_args");
    let length = match parse_opt::<usize>(matches, "length")? {
        Some(length) => length,
        None => return Err(anyhow!("walk length is required")),
    };
    let params = WalksParameters::new(length)?
        .set_iterations(parse_opt(matches, "iterations")?)?
        .set_return_weight(parse_opt(matches, "return")?)?
        .set_explore_weight(parse_opt(matches, "explore")?)?
        .set_change_edge_type_weight(parse_opt(matches, "edgetype")?)?
        .set_change_node_type_weight(parse_opt(matches, "nodetype")?)?
        .set_max_neighbours(parse_opt(matches, "maxneighbours")?)?
        .set_random_state(parse_opt(matches, "seed")?)
        .set_normalize_by_degree(Some(matches.is_present("normalize")))
        .set_verbose(Some(matches.is_present("verbose")));
    Ok(params)
} // end of parse_walk_args

fn get_delimiter(matches: &ArgMatches) -> anyhow::Result<u8> {
    match matches.value_of("delim") {
        None => Ok(b' '),
        Some("tab") | Some("\\t") => Ok(b'\t'),
        Some(str) if str.len() == 1 => Ok(str.as_bytes()[0]),
        Some(str) => Err(anyhow!("delimiter must be a single character, got {}", str)),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let params = parse_walk_args(matches)?;
    let delimiter = get_delimiter(matches)?;
    //
    let nb_threads = match parse_opt::<usize>(matches, "threads")? {
        Some(nb) if nb > 0 => nb,
        _ => num_cpus::get(),
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(nb_threads)
        .build_global()?;
    log::info!("using {} threads", nb_threads);
    //
    let csv_file = matches
        .value_of("csvfile")
        .ok_or_else(|| anyhow!("csv file is required"))?;
    log::info!("input file : {:?}", csv_file);
    let node_types = matches.value_of("nodetypes").map(Path::new);
    let (graph, node_indexation) = csv_to_typed_graph(
        Path::new(csv_file),
        matches.is_present("directed"),
        delimiter,
        node_types,
    )?;
    if let Err(err) = get_degree_quant_from_csrmat(graph.get_csrmat()) {
        log::warn!("could not compute out degree quantiles : {}", err);
    }
    //
    let walks = graph.walk(&params)?;
    let summary = WalksSummary::new(&graph, &walks);
    log::info!("{}", summary);
    //
    let output_name = matches.value_of("output").map(String::from);
    let output = Output::new(true, delimiter, &output_name);
    output.dump(&walks, Some(&node_indexation))?;
    Ok(())
} // end of run

pub fn main() {
    //
    let _ = env_logger::builder().try_init();
    log::info!("logger initialized");
    //
    let matches = Command::new("walk")
        .arg_required_else_help(true)
        .arg(Arg::new("csvfile")
            .long("csv")
            .takes_value(true)
            .required(true)
            .help("edge list: src dst [weight [edge_type]]"))
        .arg(Arg::new("nodetypes")
            .long("nodetypes")
            .takes_value(true)
            .help("file of records: node type"))
        .arg(Arg::new("directed")
            .long("directed")
            .help("edges are directed, default is undirected"))
        .arg(Arg::new("delim")
            .long("delim")
            .takes_value(true)
            .help("field delimiter, a single character or tab, default is blank"))
        .arg(Arg::new("length")
            .long("length")
            .takes_value(true)
            .required(true)
            .help("number of steps of a walk"))
        .arg(Arg::new("iterations")
            .long("iterations")
            .takes_value(true)
            .help("number of walks from each node, default 1"))
        .arg(Arg::new("return")
            .long("return")
            .takes_value(true)
            .help("weight of going back to previous node, default 1."))
        .arg(Arg::new("explore")
            .long("explore")
            .takes_value(true)
            .help("weight of going to a node not linked to previous node, default 1."))
        .arg(Arg::new("edgetype")
            .long("edgetype")
            .takes_value(true)
            .help("weight of changing edge type, default 1."))
        .arg(Arg::new("nodetype")
            .long("nodetype")
            .takes_value(true)
            .help("weight of changing node type, default 1."))
        .arg(Arg::new("seed")
            .long("seed")
            .takes_value(true)
            .help("random state, default 42"))
        .arg(Arg::new("maxneighbours")
            .long("maxneighbours")
            .takes_value(true)
            .help("number of neighbours sampled at each step on high degree nodes"))
        .arg(Arg::new("normalize")
            .long("normalize")
            .help("divide transition weights by 1 + degree of destination"))
        .arg(Arg::new("verbose")
            .long("verbose")
            .short('v')
            .help("display a progress bar"))
        .arg(Arg::new("threads")
            .long("threads")
            .takes_value(true)
            .help("number of threads, default is number of cpus"))
        .arg(Arg::new("output")
            .long("output")
            .short('o')
            .takes_value(true)
            .help("output file, default walks.csv"))
        .get_matches();
    //
    if let Err(err) = run(&matches) {
        log::error!("walk failed : {:?}", err);
        std::process::exit(1);
    }
} // end of main
