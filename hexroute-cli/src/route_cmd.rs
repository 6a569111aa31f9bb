//! Route command - populate a map and route units across it

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexroute_core::{lookahead, Hex, HexMap, PatternCatalog, Unit, DIRECTION_NAMES};
use hexroute_search::{find_paths_many, RouteRequest, SearchConfig, SearchResult};

#[derive(Args)]
pub struct RouteArgs {
    /// Map radius in rings around the origin
    #[arg(long, default_value = "4")]
    pub radius: u16,

    /// Starting cell as Q,R
    #[arg(long, default_value = "0,0", value_parser = parse_hex, allow_hyphen_values = true)]
    pub from: Hex,

    /// Target cell as Q,R (repeat for several units)
    #[arg(long = "to", required = true, value_parser = parse_hex, allow_hyphen_values = true)]
    pub targets: Vec<Hex>,

    /// Fuel per turn
    #[arg(long, default_value = "10")]
    pub fuel: i32,

    /// Cargo carried
    #[arg(long, default_value = "0")]
    pub load: u32,

    /// Cargo capacity
    #[arg(long, default_value = "0")]
    pub capacity: u32,

    /// Unit size
    #[arg(long, default_value = "1")]
    pub size: u32,

    /// Number of cells to strip of their pattern
    #[arg(long, default_value = "0")]
    pub planets: usize,

    /// Number of cells to mark occupied
    #[arg(long, default_value = "0")]
    pub blockers: usize,

    /// Search window override
    #[arg(long)]
    pub window: Option<u32>,

    /// Relaxation round cap override
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Search config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Routes to print per target
    #[arg(long, default_value = "3")]
    pub top: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: RouteArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args)?;
    let mut rng = create_rng(seed);

    let map = build_map(&args, &mut rng)?;
    let unit = build_unit(&args);

    log_lookahead(&map, &unit);

    let requests: Vec<RouteRequest<Hex>> = args
        .targets
        .iter()
        .map(|&target| RouteRequest::new(unit.clone(), target))
        .collect();

    tracing::info!(
        "Routing {} target(s) from {} on radius {} map",
        requests.len(),
        format_hex(args.from),
        args.radius
    );

    let results = find_paths_many(&map, &requests, &config);
    report_results(&args, &unit, &results)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &RouteArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config from {:?}", path))?
        }
        None => SearchConfig::default(),
    };

    if let Some(window) = args.window {
        config = config.with_window(window);
    }
    if let Some(rounds) = args.max_rounds {
        config = config.with_max_rounds(rounds);
    }

    Ok(config)
}

fn build_map(args: &RouteArgs, rng: &mut ChaCha8Rng) -> Result<HexMap> {
    let mut map = HexMap::new(args.radius);

    if !map.contains(args.from) {
        bail!("Start {} is off the map", format_hex(args.from));
    }
    for &target in &args.targets {
        if !map.contains(target) {
            bail!("Target {} is off the map", format_hex(target));
        }
    }

    let catalog = PatternCatalog::seeded(rng_seed(rng)).context("Failed to build pattern catalog")?;
    let bound = map.populate(&catalog, rng);
    tracing::debug!("Bound {} patterns", bound);

    // Keep the start and targets free of obstacles
    let mut free: Vec<Hex> = map
        .hexes()
        .into_iter()
        .filter(|h| *h != args.from && !args.targets.contains(h))
        .collect();
    free.shuffle(rng);

    let mut free = free.into_iter();
    for hex in free.by_ref().take(args.planets) {
        map.clear_pattern(hex)?;
    }
    for hex in free.take(args.blockers) {
        map.set_occupied(hex, true)?;
    }

    Ok(map)
}

fn build_unit(args: &RouteArgs) -> Unit<Hex> {
    Unit::new(args.from, args.fuel)
        .with_capacity(args.capacity)
        .with_load(args.load)
        .with_size(args.size)
}

fn report_results(args: &RouteArgs, unit: &Unit<Hex>, results: &[SearchResult<Hex>]) -> Result<()> {
    if args.json {
        print_json_results(args, unit, results)
    } else {
        print_text_results(args, results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn log_lookahead(map: &HexMap, unit: &Unit<Hex>) {
    let options = lookahead(map, unit);
    let summary: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(d, option)| match option {
            Some(transit) => format!("{}={}", DIRECTION_NAMES[d], transit.cost),
            None => format!("{}=-", DIRECTION_NAMES[d]),
        })
        .collect();
    tracing::info!("Lookahead from {}: {}", format_hex(unit.cell), summary.join(" "));
}

fn print_text_results(args: &RouteArgs, results: &[SearchResult<Hex>]) {
    for result in results {
        println!("\n=== Route to {} ===", format_hex(result.target));
        println!(
            "Status: {:?}  rounds: {}  expanded: {}",
            result.status, result.rounds, result.expanded
        );

        for ranked in result.paths().iter().take(args.top) {
            println!(
                "\n#{} cost {} over {} turn(s), {} step(s)",
                ranked.rank + 1,
                ranked.metric,
                ranked.turns + 1,
                ranked.path.len()
            );
            for leg in &ranked.path.legs {
                let step = result.tree.get(leg.node);
                println!(
                    "  turn {:>2}  {:<2} -> {:<9} cost {:>2}  fuel {:>3}",
                    step.turn,
                    DIRECTION_NAMES[leg.direction as usize],
                    format_hex(leg.cell),
                    step.cost,
                    step.config.fuel
                );
            }
        }
    }
}

fn print_json_results(args: &RouteArgs, unit: &Unit<Hex>, results: &[SearchResult<Hex>]) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonLeg {
        turn: u32,
        direction: &'static str,
        cell: Hex,
        cost: u32,
        fuel: i32,
    }

    #[derive(serde::Serialize)]
    struct JsonRoute {
        rank: usize,
        cost: u32,
        turns: u32,
        legs: Vec<JsonLeg>,
    }

    #[derive(serde::Serialize)]
    struct JsonResult {
        target: Hex,
        status: String,
        rounds: u32,
        expanded: usize,
        routes: Vec<JsonRoute>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        unit: &'a Unit<Hex>,
        results: Vec<JsonResult>,
    }

    let output = JsonOutput {
        unit,
        results: results
            .iter()
            .map(|result| JsonResult {
                target: result.target,
                status: format!("{:?}", result.status),
                rounds: result.rounds,
                expanded: result.expanded,
                routes: result
                    .paths()
                    .into_iter()
                    .take(args.top)
                    .map(|ranked| JsonRoute {
                        rank: ranked.rank,
                        cost: ranked.metric,
                        turns: ranked.turns,
                        legs: ranked
                            .path
                            .legs
                            .iter()
                            .map(|leg| {
                                let step = result.tree.get(leg.node);
                                JsonLeg {
                                    turn: step.turn,
                                    direction: DIRECTION_NAMES[leg.direction as usize],
                                    cell: leg.cell,
                                    cost: step.cost,
                                    fuel: step.config.fuel,
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn rng_seed(rng: &mut ChaCha8Rng) -> u64 {
    use rand::Rng;
    rng.gen()
}

/// Parse "Q,R" into a hex
pub fn parse_hex(s: &str) -> Result<Hex, String> {
    let (q, r) = s
        .split_once(',')
        .ok_or_else(|| format!("expected Q,R, got '{}'", s))?;
    let q = q.trim().parse::<i16>().map_err(|e| format!("bad q '{}': {}", q, e))?;
    let r = r.trim().parse::<i16>().map_err(|e| format!("bad r '{}': {}", r, e))?;
    Ok(Hex::new(q, r))
}

fn format_hex(hex: Hex) -> String {
    format!("({},{})", hex.q, hex.r)
}
