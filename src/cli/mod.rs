//! CLI module
//!
//! Command-line interface for depot-hashes.

mod args;

pub use args::Args;

use crate::config::{self, Config};
use crate::core::filenames::{self, FileNameTable};
use crate::core::manifest::{self, DepotManifest};
use crate::core::reconcile::{self, Separators};
use crate::util::http;
use anyhow::{Context, Result};
use std::io::Write;

/// Load the configuration selected on the command line
pub fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// Fetch both sides, reconcile and print the report
pub async fn run(args: &Args, config: &Config) -> Result<()> {
    let client = http::build_client(&config.network)?;

    let (table, manifest) = fetch_both(&client, config, args).await?;

    if args.verbose > 0 {
        let mut stderr = std::io::stderr().lock();
        for (hash, name) in table.iter() {
            writeln!(stderr, "filename_sha1=\"{}\", filename=\"{}\"", hash, name)?;
        }
    }

    let separators = if args.linux {
        Separators::Posix
    } else {
        Separators::Windows
    };
    let lines = reconcile::reconcile(&table, &manifest, separators);

    let resolved = lines.iter().filter(|line| line.resolved).count();
    tracing::info!("Resolved {} of {} file names", resolved, lines.len());

    let mut stdout = std::io::stdout().lock();
    reconcile::write_report(&lines, &mut stdout).context("Failed to write report")?;

    Ok(())
}

/// Fetch the name table and the manifest
///
/// With an explicit manifest id both requests run together; otherwise the
/// id listed on the depot page is used once the page has been read.
async fn fetch_both(
    client: &reqwest::Client,
    config: &Config,
    args: &Args,
) -> Result<(FileNameTable, DepotManifest)> {
    let host = host_of(&config.endpoints.metadata_url);

    match args.manifest_id {
        Some(manifest_id) => {
            eprint!("Requesting filenames from {} and manifest {}...", host, manifest_id);
            let result = tokio::try_join!(
                filenames::fetch_filename_table(client, config, args.depot_id),
                manifest::fetch_manifest(client, config, args.depot_id, manifest_id),
            )?;
            eprintln!(" OK");
            Ok(result)
        }
        None => {
            eprint!("Requesting filenames from {}...", host);
            let table = filenames::fetch_filename_table(client, config, args.depot_id).await?;
            eprintln!(" OK");

            let manifest_id = table.manifest_id(None)?;

            eprint!("Downloading manifest {}...", manifest_id);
            let manifest =
                manifest::fetch_manifest(client, config, args.depot_id, manifest_id).await?;
            eprintln!(" OK");

            Ok((table, manifest))
        }
    }
}

fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://steamdb.info"), "steamdb.info");
        assert_eq!(host_of("http://localhost:8000/mirror/"), "localhost:8000");
        assert_eq!(host_of("steamdb.info"), "steamdb.info");
    }

    #[test]
    fn test_load_config_from_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[network]\ntimeout_seconds = 5\n").unwrap();

        let args = Args {
            verbose: 0,
            linux: false,
            config: Some(path),
            depot_id: 1,
            manifest_id: None,
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.network.timeout_seconds, 5);
    }
}
