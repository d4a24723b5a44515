use std::{io, process::ExitCode};

use clap::{builder::RangedU64ValueParser, Parser};
use ip_router::{
    config::{DEFAULT_METRIC_UNREACHABLE, DEFAULT_NUM_NICS},
    run, Metric, RouterConfig, RoutingStage,
};
use log::{debug, error};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Compute best routes from the updates (`U`) read from stdin. Every change of a best route is
/// written to stdout as an advertisement (`A`) followed by a forwarding-table entry (`T`).
/// Packets (`P`) are copied to stdout, so the output can be piped into `ip_forward`.
struct Cli {
    /// Number of network interfaces.
    #[arg(long, default_value_t = DEFAULT_NUM_NICS, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    num_nics: usize,

    /// Metric from which on a subnet is unreachable.
    #[arg(long, default_value_t = DEFAULT_METRIC_UNREACHABLE, value_parser = clap::value_parser!(u32).range(1..))]
    metric_unreachable: Metric,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let config = RouterConfig::new(args.num_nics, args.metric_unreachable);
    let mut stage = RoutingStage::new(config);
    let stdout = io::stdout();
    if let Err(e) = run(&mut stage, io::stdin().lock(), &mut stdout.lock()) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    debug!("{} reachable subnets", stage.table().len());
    ExitCode::SUCCESS
}
