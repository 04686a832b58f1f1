//! Command-line front end for Orbit.
//!
//! Drives the search engine without a window: query, execute, refresh and
//! inspect configuration from a terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::core::frecency::ExecutionLog;
use crate::core::{HostCommand, Notification, Notifier, PluginType, SearchEngine, SearchResultItem};
use crate::core::notify::Severity;
use crate::error::{OrbitError, OrbitResult};
use crate::i18n::BuiltInTranslations;
use crate::platform;

#[derive(Parser)]
#[command(name = "orbit")]
#[command(about = "Plugin-based launcher search engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    pub log: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search all plugins; an empty query lists favorites
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// Search, then execute the result at the given position
    Execute {
        query: String,

        /// Zero-based position in the result list
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Run with elevated privileges where the plugin supports it
        #[arg(long)]
        privileged: bool,
    },

    /// Search, then print the auto-completed input for a result
    Complete {
        query: String,

        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Search, then reveal a result in the file manager
    OpenLocation {
        query: String,

        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Rebuild indexes of all plugins, or of one
    Refresh {
        /// Plugin type, e.g. programs or files
        #[arg(long)]
        plugin: Option<PluginType>,
    },

    /// Drop cached plugin artifacts such as resolved icons
    ClearCaches,

    /// Forget every logged execution
    ClearLog,

    /// Print the effective configuration
    Config {
        /// Write the default configuration if no config file exists
        #[arg(long)]
        init: bool,
    },
}

/// Run one CLI command against a freshly built engine.
pub async fn run(cli: Cli) -> OrbitResult<()> {
    let store = Arc::new(match &cli.config {
        Some(path) => FileConfigStore::new(path.clone()),
        None => FileConfigStore::default(),
    });

    if let Commands::Config { init } = &cli.command {
        return print_config(&store, *init);
    }

    let (notifier, mut notifications) = Notifier::channel();
    let engine = SearchEngine::new(
        store,
        Arc::new(BuiltInTranslations),
        platform::current(),
        notifier,
        ExecutionLog::load_from(&ExecutionLog::default_path()),
    );

    let needs_index = matches!(
        cli.command,
        Commands::Search { .. }
            | Commands::Execute { .. }
            | Commands::Complete { .. }
            | Commands::OpenLocation { .. }
    );
    if needs_index {
        engine.refresh_all_indexes().await?;
        drain(&engine, &mut notifications, false).await;
    }

    let result = run_command(&engine, cli.command, cli.json).await;
    drain(&engine, &mut notifications, true).await;

    engine.shutdown().await?;
    result
}

async fn run_command(engine: &SearchEngine, command: Commands, json: bool) -> OrbitResult<()> {
    match command {
        Commands::Search { query } => {
            let results = engine.search(&query)?;
            print_results(&results, json)
        }
        Commands::Execute {
            query,
            index,
            privileged,
        } => {
            let item = pick(engine, &query, index)?;
            let outcome = engine.execute(&query, &item, privileged).await?;
            log::debug!("Executed '{}' (hide window: {})", item.name, outcome.hide_main_window);
            Ok(())
        }
        Commands::Complete { query, index } => {
            let item = pick(engine, &query, index)?;
            let completion = engine.auto_complete(&item).await?;
            println!("{}", completion.updated_user_input);
            Ok(())
        }
        Commands::OpenLocation { query, index } => {
            let item = pick(engine, &query, index)?;
            engine.open_location(&item).await
        }
        Commands::Refresh { plugin: Some(plugin_type) } => {
            engine.refresh_index_by_plugin(plugin_type).await
        }
        Commands::Refresh { plugin: None } => engine.refresh_all_indexes().await,
        Commands::ClearCaches => engine.clear_caches().await,
        Commands::ClearLog => engine.clear_execution_log(),
        Commands::Config { .. } => Ok(()),
    }
}

fn pick(engine: &SearchEngine, query: &str, index: usize) -> OrbitResult<SearchResultItem> {
    engine
        .search(query)?
        .into_iter()
        .nth(index)
        .ok_or_else(|| OrbitError::ExecutionFailed(format!("No result at position {}", index)))
}

fn print_results(results: &[SearchResultItem], json: bool) -> OrbitResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for (position, item) in results.iter().enumerate() {
        match &item.description {
            Some(description) => println!(
                "{:>2}  {}  ({})  [{}]",
                position, item.name, description, item.origin_plugin_type
            ),
            None => println!("{:>2}  {}  [{}]", position, item.name, item.origin_plugin_type),
        }
    }
    Ok(())
}

fn print_config(store: &FileConfigStore, init: bool) -> OrbitResult<()> {
    if init && !store.path().exists() {
        store.save_config(&Config::default())?;
        log::info!("Wrote default config to {}", store.path().display());
    }

    println!("# {}", store.path().display());
    print!("{}", toml::to_string_pretty(&store.get_config())?);
    Ok(())
}

/// Report pending notifications and carry out host commands a terminal can honor.
async fn drain(engine: &SearchEngine, notifications: &mut UnboundedReceiver<Notification>, report: bool) {
    while let Ok(notification) = notifications.try_recv() {
        match notification {
            Notification::IndexRefreshStarted | Notification::IndexRefreshCompleted => {
                log::debug!("{:?}", notification);
            }
            Notification::Message { severity: Severity::Error, message } => {
                log::error!("{}", message);
            }
            Notification::Message { severity: Severity::Info, message } => {
                if report {
                    log::info!("{}", message);
                }
            }
            Notification::CommandRequested { command } => match command {
                HostCommand::RefreshIndexes => {
                    if let Err(e) = engine.refresh_all_indexes().await {
                        log::error!("{}", e);
                    }
                }
                HostCommand::ClearCaches => {
                    if let Err(e) = engine.clear_caches().await {
                        log::error!("{}", e);
                    }
                }
                other => log::warn!("'{}' is not available from the command line", other.key()),
            },
        }
    }
}
