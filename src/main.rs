//! Orbit command-line launcher.

use clap::Parser;
use env_logger::{Builder, Env, Target};
use std::fs;

use orbit::cli::{self, Cli};
use orbit::OrbitResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli::run(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(cli: &Cli) -> OrbitResult<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder.init();
    Ok(())
}
