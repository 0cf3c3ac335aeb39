//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Extract SHA1 hashes and recover file names from a depot manifest
#[derive(Parser, Debug)]
#[command(name = "depot-hashes")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Print the recovered name table to stderr (repeat for debug logging)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output file names with linux separators
    #[arg(short, long)]
    pub linux: bool,

    /// Read configuration from this file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Depot id
    #[arg(value_name = "DEPOT_ID")]
    pub depot_id: u32,

    /// Manifest id (defaults to the latest listed for the depot)
    #[arg(value_name = "MANIFEST_ID")]
    pub manifest_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from(["depot-hashes", "-vv", "-l", "228990", "42"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.linux);
        assert_eq!(args.depot_id, 228990);
        assert_eq!(args.manifest_id, Some(42));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_manifest_id_optional() {
        let args = Args::try_parse_from(["depot-hashes", "228990"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.linux);
        assert_eq!(args.manifest_id, None);
    }

    #[test]
    fn test_depot_id_required_and_numeric() {
        assert!(Args::try_parse_from(["depot-hashes"]).is_err());
        assert!(Args::try_parse_from(["depot-hashes", "abc"]).is_err());
    }
}
