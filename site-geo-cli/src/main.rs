use std::path::Path;

use anyhow::Result;
use clap::Parser as ClapParser;
use log::info;
use site_geo_cli::batch::analyze_sites;
use site_geo_cli::io::cli::Cli;
use site_geo_cli::io::output::SiteToolOutput;
use site_geo_cli::{EPOCH, io};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = io::read_config(args.config_file.as_deref())?;
    info!("Successfully parsed SiteToolConfig: {config:?}");

    let ext_sites = io::read_sites(args.input_file.as_path())?;
    info!("[MAIN] {} site(s) read from {}", ext_sites.len(), args.input_file.display());

    let timestamp = jiff::Timestamp::now().to_string();
    let reports = analyze_sites(&ext_sites, &config, &timestamp)?;

    let output = SiteToolOutput { reports, config };
    io::write_json(&output, Path::new(&args.output_file))?;

    info!("[MAIN] finished in {:.3}s", EPOCH.elapsed().as_secs_f64());
    Ok(())
}
