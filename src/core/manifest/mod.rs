//! Depot manifests
//!
//! Downloads a depot manifest from the content host and decodes the file
//! records needed for reconciliation.
//!
//! A manifest is usually served zipped. Unzipped, it is a run of sections,
//! each a little-endian `u32` magic and `u32` length followed by a protobuf
//! message, closed by an end marker with no length.

mod proto;

use crate::config::Config;
use crate::util::http;
use anyhow::{Context, Result};
use prost::Message;
use std::io::{Cursor, Read};

pub use proto::{ContentManifestMetadata, ContentManifestPayload, FileMapping};

const PAYLOAD_MAGIC: u32 = 0x71F6_17D0;
const METADATA_MAGIC: u32 = 0x1F48_12BE;
const SIGNATURE_MAGIC: u32 = 0x1B81_B817;
const END_OF_MANIFEST_MAGIC: u32 = 0x32C4_15AB;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Manifest format revision requested from the content host
const MANIFEST_REVISION: u32 = 5;

/// Depot file flag marking directories
pub const FLAG_DIRECTORY: u32 = 0x40;

/// Manifest decoding failures
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest truncated at offset {0}")]
    Truncated(usize),
    #[error("unexpected section magic {found:#010x}, expected {expected:#010x}")]
    UnexpectedMagic { expected: u32, found: u32 },
    #[error("failed to decode manifest section: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("failed to open zipped manifest: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to read zipped manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("zipped manifest is empty")]
    EmptyArchive,
}

/// One file record from a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// SHA1 of the lowercased file name, hex
    pub name_hash: String,
    /// SHA1 of the file content, hex; all zeros for empty files
    pub content_hash: String,
    pub flags: u32,
    pub size: u64,
    pub link_target: Option<String>,
}

impl ManifestEntry {
    pub fn is_directory(&self) -> bool {
        self.flags & FLAG_DIRECTORY != 0
    }

    pub fn is_symlink(&self) -> bool {
        self.link_target.is_some()
    }

    pub fn is_file(&self) -> bool {
        !self.is_directory() && !self.is_symlink()
    }
}

impl From<FileMapping> for ManifestEntry {
    fn from(mapping: FileMapping) -> Self {
        Self {
            name_hash: hex::encode(mapping.sha_filename.unwrap_or_default()),
            content_hash: hex::encode(mapping.sha_content.unwrap_or_default()),
            flags: mapping.flags.unwrap_or_default(),
            size: mapping.size.unwrap_or_default(),
            link_target: mapping.linktarget.filter(|target| !target.is_empty()),
        }
    }
}

/// Manifest-level information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub depot_id: u32,
    pub manifest_id: u64,
    pub creation_time: u32,
    pub filenames_encrypted: bool,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl From<ContentManifestMetadata> for ManifestInfo {
    fn from(metadata: ContentManifestMetadata) -> Self {
        Self {
            depot_id: metadata.depot_id.unwrap_or_default(),
            manifest_id: metadata.gid_manifest.unwrap_or_default(),
            creation_time: metadata.creation_time.unwrap_or_default(),
            filenames_encrypted: metadata.filenames_encrypted.unwrap_or_default(),
            original_size: metadata.cb_disk_original.unwrap_or_default(),
            compressed_size: metadata.cb_disk_compressed.unwrap_or_default(),
        }
    }
}

/// Decoded depot manifest
#[derive(Debug, Clone, Default)]
pub struct DepotManifest {
    pub info: ManifestInfo,
    /// Entries in stored order
    pub entries: Vec<ManifestEntry>,
    pub signature: Option<Vec<u8>>,
}

impl DepotManifest {
    /// Decode a manifest blob, zipped or not
    pub fn decode(data: &[u8]) -> Result<Self, ManifestError> {
        if data.starts_with(ZIP_MAGIC) {
            let unzipped = unzip_first(data)?;
            return Self::decode_sections(&unzipped);
        }
        Self::decode_sections(data)
    }

    fn decode_sections(data: &[u8]) -> Result<Self, ManifestError> {
        let mut reader = SectionReader { data, offset: 0 };

        let payload = reader.section(PAYLOAD_MAGIC)?;
        let payload = ContentManifestPayload::decode(payload)?;

        let metadata = reader.section(METADATA_MAGIC)?;
        let metadata = ContentManifestMetadata::decode(metadata)?;

        let mut signature = None;
        if reader.peek_magic()? == SIGNATURE_MAGIC {
            let section = reader.section(SIGNATURE_MAGIC)?;
            signature = proto::ContentManifestSignature::decode(section)?.signature;
        }

        reader.expect_magic(END_OF_MANIFEST_MAGIC)?;

        Ok(Self {
            info: metadata.into(),
            entries: payload.mappings.into_iter().map(ManifestEntry::from).collect(),
            signature,
        })
    }

    /// Entries that are regular files
    pub fn files(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(|entry| entry.is_file())
    }
}

struct SectionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SectionReader<'a> {
    fn read_u32(&mut self) -> Result<u32, ManifestError> {
        let value = self.peek_magic()?;
        self.offset += 4;
        Ok(value)
    }

    fn peek_magic(&self) -> Result<u32, ManifestError> {
        let bytes = self
            .data
            .get(self.offset..self.offset + 4)
            .ok_or(ManifestError::Truncated(self.offset))?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(buf))
    }

    fn expect_magic(&mut self, expected: u32) -> Result<(), ManifestError> {
        let found = self.read_u32()?;
        if found != expected {
            return Err(ManifestError::UnexpectedMagic { expected, found });
        }
        Ok(())
    }

    /// Read a length-prefixed section body with the given magic
    fn section(&mut self, magic: u32) -> Result<&'a [u8], ManifestError> {
        self.expect_magic(magic)?;
        let length = self.read_u32()? as usize;
        let body = self
            .data
            .get(self.offset..self.offset + length)
            .ok_or(ManifestError::Truncated(self.offset))?;
        self.offset += length;
        Ok(body)
    }
}

fn unzip_first(data: &[u8]) -> Result<Vec<u8>, ManifestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    if archive.len() == 0 {
        return Err(ManifestError::EmptyArchive);
    }

    let mut entry = archive.by_index(0)?;
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Manifest URL on the content host
pub fn manifest_url(config: &Config, depot_id: u32, manifest_id: u64) -> String {
    format!(
        "{}/depot/{}/manifest/{}/{}",
        config.endpoints.content_url.trim_end_matches('/'),
        depot_id,
        manifest_id,
        MANIFEST_REVISION
    )
}

/// Download and decode a depot manifest
pub async fn fetch_manifest(
    client: &reqwest::Client,
    config: &Config,
    depot_id: u32,
    manifest_id: u64,
) -> Result<DepotManifest> {
    let url = manifest_url(config, depot_id, manifest_id);
    tracing::info!("Fetching manifest {} for depot {}", manifest_id, depot_id);

    let data = http::get_bytes(client, &url)
        .await
        .context("Failed to download manifest")?;
    let manifest = DepotManifest::decode(&data)
        .with_context(|| format!("Failed to decode manifest {}", manifest_id))?;

    tracing::info!(
        "Decoded manifest {} (created {}, signed: {}) with {} entries ({} files)",
        manifest.info.manifest_id,
        manifest.info.creation_time,
        manifest.signature.is_some(),
        manifest.entries.len(),
        manifest.files().count()
    );
    Ok(manifest)
}
