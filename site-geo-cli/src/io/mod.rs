use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use site_geo::io::ext_repr::ExtSite;

use crate::EPOCH;
use crate::config::SiteToolConfig;

pub mod cli;
pub mod output;

/// An input file holds either a single site or a batch of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtSiteFile {
    Single(ExtSite),
    Batch(Vec<ExtSite>),
}

pub fn read_sites(path: &Path) -> Result<Vec<ExtSite>> {
    let file = File::open(path).context(format!("could not open site file: {}", path.display()))?;
    let ext_file: ExtSiteFile = serde_json::from_reader(BufReader::new(file))
        .context(format!("could not parse site file: {}", path.display()))?;
    let sites = match ext_file {
        ExtSiteFile::Single(site) => vec![site],
        ExtSiteFile::Batch(sites) => sites,
    };
    Ok(sites)
}

pub fn read_config(path: Option<&Path>) -> Result<SiteToolConfig> {
    match path {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            Ok(SiteToolConfig::default())
        }
        Some(path) => {
            let file = File::open(path)
                .context(format!("could not open config file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file)).context("incorrect config file format")
        }
    }
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .context(format!("could not create output file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .context(format!("could not write output file: {}", path.display()))?;

    info!("[MAIN] report written to {}", path.display());
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        // Add blanket level filter -
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()?;
    info!("[MAIN] start time: {}", jiff::Timestamp::now());
    Ok(())
}
