use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use blogd_server::{BlogServer, ServerConfig};
use blogd_store::InMemoryDocumentStore;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} blogd on {} (collection {}.{})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.database,
        config.collection.cyan(),
    );

    let store = Arc::new(InMemoryDocumentStore::new(config.collection.clone()));
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(BlogServer::new(config, store).serve())?;

    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
