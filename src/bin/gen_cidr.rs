use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use clap::Parser;
use ip_router::{BitPrefix, Event};
use log::error;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Print random forwarding-table entries (`T` lines), to be fed into `ip_forward`. The i-th entry
/// is bound to interface i.
struct Cli {
    /// Number of entries to generate.
    count: usize,

    /// Seed of the random generator, for reproducible tables.
    #[arg(long)]
    seed: Option<u64>,
}

fn random_prefix<R: Rng>(rng: &mut R) -> BitPrefix {
    let len = rng.gen_range(1..=31);
    BitPrefix::new(rng.gen(), len)
}

/// Write `count` table entries. Entry `i` (counted from 1) is bound to interface `i`.
fn generate<R: Rng, W: Write>(rng: &mut R, count: usize, out: &mut W) -> io::Result<()> {
    for nic in 1..=count {
        let event = Event::TableEntry {
            prefix: random_prefix(rng),
            nic: Some(nic),
        };
        writeln!(out, "{event}")?;
    }
    out.flush()
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let mut rng = seeded(args.seed);
    let mut out = BufWriter::new(io::stdout().lock());
    if let Err(e) = generate(&mut rng, args.count, &mut out) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
