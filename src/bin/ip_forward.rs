use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use ip_router::{run, Error, ForwardingStage, Result};
use log::{error, info};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Forward packets read from stdin along the longest matching prefix. Table entries (`T`) update
/// the forwarding table, packets (`P`) are answered with `O <id> <nic>`, and advertisements (`A`)
/// are copied to stdout. At the end of the input, the forwarding table is written to OUTPUT.
struct Cli {
    /// Where to write the forwarding table. Use `-` for stdout.
    #[arg(default_value = "fwd_table.txt")]
    output: PathBuf,
}

fn open_sink(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(path).map_err(|source| Error::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    // fail before consuming any input if the snapshot cannot be written.
    let mut sink = match open_sink(&args.output) {
        Ok(sink) => sink,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    let mut stage = ForwardingStage::new();
    let stdout = io::stdout();
    let mut status = ExitCode::SUCCESS;
    if let Err(e) = run(&mut stage, io::stdin().lock(), &mut stdout.lock()) {
        error!("{e}");
        status = ExitCode::FAILURE;
    }

    // the table is written even if the input ended with an error.
    match stage.write_snapshot(&mut sink) {
        Ok(()) => info!(
            "wrote {} entries to {}",
            stage.fib().len(),
            args.output.display()
        ),
        Err(e) => {
            error!("{e}");
            status = ExitCode::FAILURE;
        }
    }
    status
}
