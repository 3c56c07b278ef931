//! Folio - render a portfolio site from plain text descriptors.

use anyhow::Result;
use clap::Parser;
use folio::{
    build::{build_site, clean_cache},
    cli::{Cli, Commands},
    config::{SiteConfig, cfg, init_config},
    serve::serve_site,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Build { .. } => build_site(&cfg()).map(|_| ()),
        Commands::Serve { .. } => {
            build_site(&cfg())?;
            serve_site()
        }
        Commands::Clean => clean_cache(&cfg()),
    }
}
