//! Route search timing benchmark
//!
//! Compares:
//! 1. Time to route one unit at various map radii and tank sizes
//! 2. Batch throughput (routes per second) sequential vs batched

use std::time::Instant;

use hexroute_core::{Hex, HexMap, PatternCatalog, Unit};
use hexroute_search::{find_paths, find_paths_many, RouteRequest, SearchConfig, Ticket};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST MAPS
// ============================================================================

fn populated_map(radius: u16, seed: u64) -> HexMap {
    let catalog = PatternCatalog::seeded(seed).unwrap();
    let mut map = HexMap::new(radius);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    map.populate(&catalog, &mut rng);
    map
}

/// Far corner of the map, opposite the start
fn far_target(radius: u16) -> Hex {
    Hex::new(radius as i16, -(radius as i16) / 2)
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    label: String,
    config: String,
    avg_route_time_ms: f64,
    routes_per_second: f64,
    expanded: usize,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {} | {} | {:.2}ms | {:.0} | {} |",
            self.label, self.config, self.avg_route_time_ms, self.routes_per_second, self.expanded
        )
    }
}

// ============================================================================
// BENCHMARK: Single Route
// ============================================================================

fn benchmark_single_route() -> Vec<BenchmarkResult> {
    println!("\n=== SINGLE ROUTE BENCHMARK ===");
    let mut results = Vec::new();

    for radius in [3u16, 5, 7] {
        let map = populated_map(radius, 11);
        let start_hex = Hex::new(-(radius as i16), 0);
        let target = far_target(radius);

        for fuel in [10, 30] {
            print!("  radius {} fuel {} ... ", radius, fuel);
            let unit = Unit::new(start_hex, fuel).with_capacity(1);

            let iterations = 5;
            let mut total_time = 0.0;
            let mut expanded = 0;
            for _ in 0..iterations {
                let start = Instant::now();
                let result = find_paths(&map, &unit, target, &SearchConfig::default(), &Ticket::detached());
                total_time += start.elapsed().as_secs_f64() * 1000.0;
                expanded = result.expanded;
            }

            let avg_time = total_time / iterations as f64;
            results.push(BenchmarkResult {
                label: format!("Radius {}", radius),
                config: format!("Fuel {}", fuel),
                avg_route_time_ms: avg_time,
                routes_per_second: 1000.0 / avg_time,
                expanded,
            });
            println!("{:.2}ms ({} expanded)", avg_time, expanded);
        }
    }

    results
}

// ============================================================================
// BENCHMARK: Batch Throughput
// ============================================================================

fn benchmark_batch() -> Vec<BenchmarkResult> {
    println!("\n=== BATCH THROUGHPUT BENCHMARK ===");
    let radius = 5;
    let map = populated_map(radius, 4);
    let config = SearchConfig::default();

    let requests: Vec<RouteRequest<Hex>> = map
        .hexes()
        .into_iter()
        .filter(|h| h.distance_to_center() == radius as i16)
        .map(|h| RouteRequest::new(Unit::new(Hex::ORIGIN, 12), h))
        .collect();

    print!("  sequential {} routes ... ", requests.len());
    let start = Instant::now();
    let mut expanded = 0;
    for r in &requests {
        expanded += find_paths(&map, &r.unit, r.target, &config, &r.ticket).expanded;
    }
    let sequential = start.elapsed().as_secs_f64() * 1000.0;
    println!("{:.0}ms", sequential);

    print!("  batched {} routes ... ", requests.len());
    let start = Instant::now();
    let batch = find_paths_many(&map, &requests, &config);
    let batched = start.elapsed().as_secs_f64() * 1000.0;
    println!("{:.0}ms", batched);

    let count = requests.len() as f64;
    vec![
        BenchmarkResult {
            label: "Sequential".to_string(),
            config: format!("{} routes", requests.len()),
            avg_route_time_ms: sequential / count,
            routes_per_second: count / sequential * 1000.0,
            expanded,
        },
        BenchmarkResult {
            label: "Batched".to_string(),
            config: format!("{} routes", requests.len()),
            avg_route_time_ms: batched / count,
            routes_per_second: count / batched * 1000.0,
            expanded: batch.iter().map(|r| r.expanded).sum(),
        },
    ]
}

fn main() {
    let mut all = benchmark_single_route();
    all.extend(benchmark_batch());

    println!("\n| Run | Config | Avg time | Routes/sec | Expanded |");
    println!("|-----|--------|----------|------------|----------|");
    for result in &all {
        println!("{}", result.to_table_row());
    }
}
