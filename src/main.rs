use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use p2psim::config::NetworkConfig;
use p2psim::config_loader::{self, ConfigOverrides};
use p2psim::report::{self, ReportMetadata, SearchReport, TrialReport};
use p2psim::search::{self, Strategy};
use p2psim::topology::templates::numbered_names;
use p2psim::topology::{build_template, place_resource, Template, Topology};
use p2psim::trials::{self, SearchParams};
use p2psim::utils::validate_topology;

/// Resource-discovery strategy simulator for unstructured P2P overlays
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one search and print its message/node counts
    Search {
        #[command(flatten)]
        search: SearchArgs,

        /// Seed for walk strategies (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Run the search this many times on the same topology, carrying caches over
        #[arg(long, default_value = "1")]
        repeat: usize,

        /// Print step-by-step playback of the walk history
        #[arg(long)]
        playback: bool,

        /// Write a JSON report of the (last) search to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write a GraphViz DOT rendering of the walk to this path
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Run isolated trials in parallel and summarize them
    Trials {
        #[command(flatten)]
        search: SearchArgs,

        /// Number of isolated trials
        #[arg(short = 'n', long, default_value = "100")]
        trials: usize,

        /// Base seed; trial i uses seed + i
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write a JSON summary to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Validate a configuration without searching
    Validate {
        /// Path to the network configuration (YAML or JSON)
        config: PathBuf,

        /// Override the configured minimum node degree
        #[arg(long)]
        min_degree: Option<usize>,
    },

    /// Generate a configuration from a topology template
    Generate {
        /// Template: chain, ring, star or mesh
        #[arg(short, long)]
        template: Template,

        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,

        /// Node name prefix
        #[arg(long, default_value = "N")]
        prefix: String,

        /// Place a resource on a node, as NODE=RESOURCE (repeatable)
        #[arg(short, long = "resource")]
        resources: Vec<String>,

        /// Output path (.yaml, .yml or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parameters shared by the search-running subcommands
#[derive(Args, Debug)]
struct SearchArgs {
    /// Path to the network configuration (YAML or JSON)
    config: PathBuf,

    /// Start node
    #[arg(long)]
    node: String,

    /// Target resource identifier
    #[arg(long)]
    resource: String,

    /// Time-to-live in hops
    #[arg(long, allow_negative_numbers = true)]
    ttl: i64,

    /// Strategy: flooding, informed_flooding, random_walk, informed_random_walk
    #[arg(long)]
    algo: String,

    /// Override the configured minimum node degree
    #[arg(long)]
    min_degree: Option<usize>,
}

impl SearchArgs {
    fn params(&self) -> Result<SearchParams> {
        Ok(SearchParams {
            strategy: self.algo.parse::<Strategy>()?,
            start: self.node.clone(),
            target: self.resource.clone(),
            ttl: self.ttl,
        })
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Search {
            search,
            seed,
            repeat,
            playback,
            json,
            dot,
        } => run_search(&search, seed, repeat, playback, json.as_deref(), dot.as_deref()),
        Commands::Trials {
            search,
            trials,
            seed,
            json,
        } => run_trials(&search, trials, seed, json.as_deref()),
        Commands::Validate { config, min_degree } => {
            load_topology(&config, min_degree)?;
            println!("Configuration '{}' is valid", config.display());
            Ok(())
        }
        Commands::Generate {
            template,
            nodes,
            prefix,
            resources,
            output,
        } => generate(template, nodes, &prefix, &resources, &output),
    }
}

/// Load, build and validate a topology. Fails before any search runs.
fn load_topology(config_path: &Path, min_degree: Option<usize>) -> Result<(NetworkConfig, Topology)> {
    let mut config = config_loader::load_config(config_path)?;
    config_loader::apply_overrides(&mut config, &ConfigOverrides { min_degree })?;

    let topology = Topology::from_config(&config)
        .wrap_err_with(|| format!("Invalid topology in '{}'", config_path.display()))?;
    validate_topology(&topology, &config)
        .wrap_err_with(|| format!("Topology validation failed for '{}'", config_path.display()))?;

    Ok((config, topology))
}

fn run_search(
    args: &SearchArgs,
    seed: Option<u64>,
    repeat: usize,
    playback: bool,
    json: Option<&Path>,
    dot: Option<&Path>,
) -> Result<()> {
    let params = args.params()?;
    let (_, mut topology) = load_topology(&args.config, args.min_degree)?;

    if repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    let seed = seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut last = None;
    for run in 1..=repeat {
        let outcome = search::run(
            params.strategy,
            &mut topology,
            &params.start,
            &params.target,
            params.ttl,
            &mut rng,
        )?;

        if repeat > 1 {
            println!("--- Run {}/{} ---", run, repeat);
        }
        println!("{}", report::format_outcome(&outcome));

        if playback {
            for frame in report::playback_frames(outcome.history.as_deref().unwrap_or(&[])) {
                println!("{}", frame);
            }
        }
        last = Some(outcome);
    }

    let Some(outcome) = last else {
        return Ok(());
    };

    if let Some(path) = dot {
        report::write_dot(&topology, outcome.history.as_deref().unwrap_or(&[]), path)?;
    }

    if let Some(path) = json {
        let report = SearchReport {
            metadata: ReportMetadata::new(&args.config, &topology, Some(seed)),
            params,
            outcome,
        };
        report::write_json_report(&report, path)?;
    }

    Ok(())
}

fn run_trials(args: &SearchArgs, trials: usize, seed: u64, json: Option<&Path>) -> Result<()> {
    let params = args.params()?;
    let (_, topology) = load_topology(&args.config, args.min_degree)?;

    let summary = trials::run_trials(&topology, &params, trials, seed)?;
    println!("{}", report::format_summary(&summary));

    if let Some(path) = json {
        let report = TrialReport {
            metadata: ReportMetadata::new(&args.config, &topology, Some(seed)),
            summary,
        };
        report::write_json_report(&report, path)?;
    }

    Ok(())
}

fn generate(
    template: Template,
    nodes: usize,
    prefix: &str,
    resources: &[String],
    output: &Path,
) -> Result<()> {
    let names = numbered_names(prefix, nodes);
    let mut config = build_template(template, &names);

    for placement in resources {
        let Some((node, resource)) = placement.split_once('=') else {
            bail!("Invalid resource placement '{}' (expected NODE=RESOURCE)", placement);
        };
        if !place_resource(&mut config, node, resource) {
            bail!("Cannot place '{}' on unknown node '{}'", resource, node);
        }
    }

    let topology = Topology::from_config(&config)?;
    validate_topology(&topology, &config).wrap_err("Generated topology is invalid")?;

    config_loader::save_config(&config, output)?;
    info!(
        "Generated {:?} topology with {} nodes at {}",
        template,
        nodes,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_parsing() {
        let cli = Cli::parse_from([
            "p2psim", "search", "net.yaml", "--node", "A", "--resource", "r1", "--ttl", "3", "--algo",
            "flooding", "--seed", "7",
        ]);

        match cli.command {
            Commands::Search { search, seed, repeat, .. } => {
                assert_eq!(search.config, PathBuf::from("net.yaml"));
                assert_eq!(search.ttl, 3);
                assert_eq!(seed, Some(7));
                assert_eq!(repeat, 1);
                assert_eq!(search.params().unwrap().strategy, Strategy::Flooding);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_negative_ttl_parses_but_is_rejected_by_engine() {
        let cli = Cli::parse_from([
            "p2psim", "trials", "net.yaml", "--node", "A", "--resource", "r1", "--ttl", "-1", "--algo",
            "random_walk",
        ]);
        match cli.command {
            Commands::Trials { search, trials, .. } => {
                assert_eq!(search.ttl, -1);
                assert_eq!(trials, 100);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_algo_is_reported() {
        let cli = Cli::parse_from([
            "p2psim", "search", "net.yaml", "--node", "A", "--resource", "r1", "--ttl", "1", "--algo",
            "gossip",
        ]);
        if let Commands::Search { search, .. } = cli.command {
            let err = search.params().unwrap_err();
            assert!(err.to_string().contains("Unknown strategy 'gossip'"));
        }
    }

    #[test]
    fn test_generate_and_validate() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("star.yaml");
        generate(Template::Star, 5, "N", &["N3=r1".to_string()], &output).unwrap();

        let (config, topology) = load_topology(&output, None).unwrap();
        assert_eq!(topology.len(), 5);
        assert_eq!(config.nodes["N3"], vec!["r1".to_string()]);

        assert!(generate(Template::Star, 3, "N", &["N9=r1".to_string()], &output).is_err());
        assert!(generate(Template::Star, 3, "N", &["bogus".to_string()], &output).is_err());
    }
}
