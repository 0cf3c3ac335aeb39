//! Reconciliation
//!
//! Joins manifest file records with the recovered name table.

use crate::core::filenames::FileNameTable;
use crate::core::manifest::DepotManifest;
use crate::util::{hash, path};
use std::fmt;
use std::io::{self, Write};

/// Separator style for recovered names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Separators {
    /// Backslashes, as stored in manifests
    #[default]
    Windows,
    /// Forward slashes
    Posix,
}

/// One report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub content_sha1: String,
    /// Whether the name was recovered from the table
    pub resolved: bool,
    /// Recovered name, or the name-hash when unresolved
    pub name: String,
}

impl ReportLine {
    pub fn marker(&self) -> char {
        if self.resolved { '*' } else { '_' }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.content_sha1, self.marker(), self.name)
    }
}

/// Produce one line per manifest file, in manifest order
pub fn reconcile(
    table: &FileNameTable,
    manifest: &DepotManifest,
    separators: Separators,
) -> Vec<ReportLine> {
    if table.is_empty() {
        tracing::warn!("Name table is empty, no file names can be recovered");
    }

    manifest
        .files()
        .map(|entry| {
            let content_sha1 = hash::content_sha1(&entry.content_hash).to_string();
            match table.get(&entry.name_hash) {
                Some(name) => ReportLine {
                    content_sha1,
                    resolved: true,
                    name: match separators {
                        Separators::Windows => name.to_string(),
                        Separators::Posix => path::to_posix(name),
                    },
                },
                None => ReportLine {
                    content_sha1,
                    resolved: false,
                    name: entry.name_hash.clone(),
                },
            }
        })
        .collect()
}

/// Write report lines, flushing after each
pub fn write_report<'a, W, I>(lines: I, out: &mut W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ReportLine>,
{
    for line in lines {
        writeln!(out, "{}", line)?;
        out.flush()?;
    }
    Ok(())
}
