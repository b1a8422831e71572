use archsim::api;
use archsim::config::EngineConfig;
use archsim::error::CoreError;
use archsim::types::{Graph, TrafficProfile};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process::ExitCode;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn load_graph(path: &PathBuf) -> Result<Graph, CoreError> {
    let raw = std::fs::read_to_string(path)?;
    let graph: Graph = serde_json::from_str(&raw)?;
    Ok(graph)
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, CoreError> {
    match path {
        None => Ok(EngineConfig::default()),
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(EngineConfig::from_toml(&raw)?)
        }
    }
}

fn graph_arg() -> Arg {
    Arg::new("graph")
        .help("Path to a graph JSON file")
        .value_parser(value_parser!(PathBuf))
        .required(true)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Path to an EngineConfig TOML file")
        .value_parser(value_parser!(PathBuf))
}

fn cli() -> Command {
    Command::new("archsim")
        .version(archsim::VERSION)
        .about("Interactive system-architecture simulator")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Validate a graph's structure and topology")
                .arg(graph_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("simulate")
                .about("Validate, simulate load, and recommend improvements")
                .arg(graph_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("users")
                        .long("users")
                        .value_parser(value_parser!(f64))
                        .help("Override number_of_users for the traffic profile"),
                )
                .arg(
                    Arg::new("rps")
                        .long("rps")
                        .value_parser(value_parser!(f64))
                        .help("Override requests_per_user for the traffic profile"),
                ),
        )
        .subcommand(Command::new("types").about("List canonical component types"))
        .subcommand(
            Command::new("layers")
                .about("Show the layer a canonical type belongs to")
                .arg(
                    Arg::new("type")
                        .help("Canonical component type name")
                        .required(false),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Print crate and build metadata")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
}

fn traffic_profile_from_args(users: Option<f64>, rps: Option<f64>) -> Option<TrafficProfile> {
    match (users, rps) {
        (Some(number_of_users), Some(requests_per_user)) => Some(TrafficProfile {
            number_of_users,
            requests_per_user,
        }),
        _ => None,
    }
}

fn run() -> Result<ExitCode, CoreError> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("validate", args)) => {
            let path = args.get_one::<PathBuf>("graph").expect("required");
            let config = load_config(args.get_one::<PathBuf>("config"))?;
            let graph = load_graph(path)?;
            if !config.within_limits(&graph) {
                eprintln!("graph exceeds configured size limits (max_nodes/max_edges)");
                return Ok(ExitCode::FAILURE);
            }
            let result = api::validate(&graph);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Some(("simulate", args)) => {
            let path = args.get_one::<PathBuf>("graph").expect("required");
            let config = load_config(args.get_one::<PathBuf>("config"))?;
            let graph = load_graph(path)?;
            if !config.within_limits(&graph) {
                eprintln!("graph exceeds configured size limits (max_nodes/max_edges)");
                return Ok(ExitCode::FAILURE);
            }
            let users = args.get_one::<f64>("users").copied();
            let rps = args.get_one::<f64>("rps").copied();
            let profile = traffic_profile_from_args(users, rps);
            let result = api::evaluate(&graph, profile);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.structural_errors.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(("types", _)) => {
            for name in api::canonical_types() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("layers", args)) => {
            match args.get_one::<String>("type") {
                Some(type_name) => match api::layer_of(type_name) {
                    Some(layer) => println!("{layer}"),
                    None => {
                        eprintln!("unrecognized canonical type: {type_name}");
                        return Ok(ExitCode::FAILURE);
                    }
                },
                None => {
                    for name in api::canonical_types() {
                        if let Some(layer) = api::layer_of(&name) {
                            println!("{name}: {layer}");
                        }
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("report", args)) => {
            let json = args.get_flag("json");
            if json {
                println!(
                    "{{\"name\":\"archsim\",\"version\":\"{}\"}}",
                    archsim::VERSION
                );
            } else {
                println!("archsim {}", archsim::VERSION);
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
