// COVID-19 IL open-data statistics - Main executable
// Author: Gabriel Demetrios Lafis

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::{error, info};

use covid19_il::{
    api::{DataGovClient, DatastoreQuery, ResourceId},
    data::JsonSource,
    handlers::{DataHandler, DatasetHandler, HandlerOptions, HandlerRegistry},
    utils::{init_logging, Config, Logger},
};

fn main() {
    let matches = Command::new("covid19-il")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Statistics over the COVID-19 datasets of data.gov.il")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("query")
                .about("Run one query against a dataset")
                .arg(Arg::new("resource").required(true).help("Dataset name, e.g. lab_tests"))
                .arg(Arg::new("method").required(true).help("Query name"))
                .arg(
                    Arg::new("arg")
                        .short('a')
                        .long("arg")
                        .value_name("VALUE")
                        .help("Argument passed to the query (date or sort order)")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .value_name("N")
                        .help("Maximum number of records to fetch")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("offset")
                        .short('o')
                        .long("offset")
                        .value_name("N")
                        .help("Number of records to skip")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Read the payload from a file instead of the API")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("methods")
                .about("List the queries a dataset supports")
                .arg(Arg::new("resource").required(true).help("Dataset name")),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path).with_context(|| format!("loading config file {}", path))?,
        None => Config::default(),
    }
    .with_env_overrides();

    if let Err(err) = init_logging(config.log_level_filter(), config.logging.file.as_deref().map(Path::new)) {
        eprintln!("Error initializing logger: {}", err);
    }

    match matches.subcommand() {
        Some(("query", sub)) => run_query(&config, sub),
        Some(("methods", sub)) => {
            let resource = parse_resource(sub)?;
            for method in DatasetHandler::methods_of(resource) {
                println!("{}", method);
            }
            Ok(())
        }
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn run_query(config: &Config, matches: &ArgMatches) -> Result<()> {
    let resource = parse_resource(matches)?;
    let method = matches.value_of("method").unwrap_or_default();
    let logger = Logger::new("covid19_il");

    let payload = match matches.value_of("input") {
        Some(path) => JsonSource::load_payload(path).with_context(|| format!("reading payload {}", path))?,
        None => {
            let query = DatastoreQuery::new()
                .limit(parse_number(matches, "limit")?)
                .offset(parse_number(matches, "offset")?)
                .include_total(true);

            let mut client = DataGovClient::from_config(config, logger.clone())?;
            client
                .get_data_by_resource_id(resource, &query)?
                .cloned()
                .ok_or_else(|| anyhow!("no payload received for {}", resource))?
        }
    };

    let registry = HandlerRegistry::new(logger, HandlerOptions::from(config));
    let handler = registry.get_instance(resource, &payload);
    let rows = handler.base().table().map_or(0, |table| table.len());
    info!("running {}.{} over {} rows", resource, method, rows);

    let outcome = handler.query(method, matches.value_of("arg"))?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn parse_resource(matches: &ArgMatches) -> Result<ResourceId> {
    let name = matches.value_of("resource").unwrap_or_default();
    Ok(name.parse::<ResourceId>()?)
}

fn parse_number(matches: &ArgMatches, name: &str) -> Result<u64> {
    match matches.value_of(name) {
        Some(value) => value
            .parse::<u64>()
            .with_context(|| format!("--{} expects a non-negative number, got {}", name, value)),
        None => Ok(0),
    }
}
