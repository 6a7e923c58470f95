//! Random sample grids: a ring of stations with cross ties.
//!
//! Station `i` carries `(80 + 10 i) * U(0.8, 1.2)` and is rated at
//! `load * U(1.3, 1.8)`. Lines run round the ring and across it (`i` to
//! `i + n/2`); each carries `(load_a + load_b) * 0.15 * U(0.7, 1.1)` and is
//! rated at `load * U(1.5, 2.2)`. Every element starts with headroom.

use gridfail_core::{Grid, GridBuilder, GridResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_STATIONS: usize = 6;

/// Generate a sample grid with `stations` nodes from `rng`.
pub fn generate_grid<R: Rng>(stations: usize, rng: &mut R) -> GridResult<Grid> {
    let mut builder = GridBuilder::new(stations)?;
    let mut loads = Vec::with_capacity(stations);
    for i in 0..stations {
        let load = (80.0 + 10.0 * i as f64) * rng.gen_range(0.8..1.2);
        let capacity = load * rng.gen_range(1.3..1.8);
        builder.add_node(i, format!("Station-{}", i + 1), load, capacity)?;
        loads.push(load);
    }

    for (from, to) in connections(stations) {
        let load = (loads[from] + loads[to]) * 0.15 * rng.gen_range(0.7..1.1);
        let capacity = load * rng.gen_range(1.5..2.2);
        builder.add_edge(from, to, capacity, load)?;
    }
    builder.build()
}

/// Reproducible when `seed` is given, otherwise seeded from OS entropy.
pub fn generate_seeded(stations: usize, seed: Option<u64>) -> GridResult<Grid> {
    let mut rng = seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);
    generate_grid(stations, &mut rng)
}

/// Ring then cross ties, skipping self-loops and repeats on tiny grids.
fn connections(n: usize) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut push = |a: usize, b: usize| {
        let key = (a.min(b), a.max(b));
        if a != b && !pairs.iter().any(|&(x, y)| (x.min(y), x.max(y)) == key) {
            pairs.push((a, b));
        }
    };
    for i in 0..n {
        push(i, (i + 1) % n);
    }
    for i in 0..n / 2 {
        push(i, i + n / 2);
    }
    pairs
}
