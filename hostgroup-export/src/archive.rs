//! Tar archive input and output.
//!
//! Input archives are firewall API exports: a `.tar` whose name contains the
//! archive marker (normally `api-`) and whose first `.xml` member holds the
//! configuration. Output archives hold a single member named like the input
//! member.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};
use xml_tree_core::{parse_reader, write_document, XmlNode};

use crate::error::ExportError;

/// File mode of the member written to output archives.
const MEMBER_MODE: u32 = 0o644;

/// Name prefix of the temporary file an output archive is staged in.
const STAGING_PREFIX: &str = ".hostgroup-export-";

/// Document read from an input archive.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArchive {
    /// Path of the archive the document came from.
    pub path: PathBuf,
    /// Member name exactly as stored in the archive.
    pub member_name: String,
    pub document: XmlNode,
}

/// Whether a file name looks like an API export archive.
///
/// Both the `.tar` extension and the marker are matched case-insensitively.
pub fn is_source_archive_name(file_name: &str, marker: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".tar") && lower.contains(&marker.to_lowercase())
}

/// Pick the most recently modified export archive in `dir`.
///
/// Only regular files qualify. Equal modification times are resolved by the
/// greater file name.
pub fn find_source_archive(dir: &Path, marker: &str) -> Result<PathBuf, ExportError> {
    let entries = fs::read_dir(dir).map_err(|source| ExportError::Archive {
        path: dir.display().to_string(),
        source,
    })?;

    let mut best: Option<(SystemTime, String, PathBuf)> = None;
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_source_archive_name(&file_name, marker) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        debug!(candidate = %file_name, "found export archive candidate");

        let newer = best.as_ref().map_or(true, |(time, name, _)| {
            (modified, file_name.as_str()) > (*time, name.as_str())
        });
        if newer {
            best = Some((modified, file_name, entry.path()));
        }
    }

    best.map(|(_, _, path)| path)
        .ok_or_else(|| ExportError::NoSourceArchive {
            dir: dir.display().to_string(),
            marker: marker.to_string(),
        })
}

/// Parse the first `.xml` member of the archive at `path`.
pub fn load_document(path: &Path) -> Result<LoadedArchive, ExportError> {
    let archive_err = |source: std::io::Error| ExportError::Archive {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(archive_err)?;
    let mut archive = tar::Archive::new(file);

    for entry in archive.entries().map_err(archive_err)? {
        let entry = entry.map_err(archive_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let member_name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if !member_name.to_lowercase().ends_with(".xml") {
            continue;
        }

        let document = parse_reader(BufReader::new(entry)).map_err(|source| ExportError::Xml {
            member: member_name.clone(),
            source,
        })?;
        info!(archive = %path.display(), member = %member_name, "loaded export document");
        return Ok(LoadedArchive {
            path: path.to_path_buf(),
            member_name,
            document,
        });
    }

    Err(ExportError::NoXmlMember {
        path: path.display().to_string(),
    })
}

/// Write `document` as the single member `member_name` of a new archive.
///
/// The archive is assembled in a temporary file next to `path` and renamed
/// over it once complete, so `path` holds either its previous content or the
/// finished archive. The member carries the current time as its modification
/// time.
pub fn write_archive(
    path: &Path,
    member_name: &str,
    document: &XmlNode,
) -> Result<(), ExportError> {
    let payload = write_document(document)?;
    let output_err = |source: std::io::Error| ExportError::Output {
        path: path.display().to_string(),
        source,
    };

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(payload.len() as u64);
    header.set_mode(MEMBER_MODE);
    header.set_mtime(chrono::Utc::now().timestamp().max(0) as u64);

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".part")
        .tempfile_in(staging_dir(path))
        .map_err(output_err)?;
    let mut builder = tar::Builder::new(staging);
    builder
        .append_data(&mut header, member_name, payload.as_slice())
        .map_err(output_err)?;
    let staging = builder.into_inner().map_err(output_err)?;
    staging.as_file().sync_all().map_err(output_err)?;
    staging.persist(path).map_err(|e| output_err(e.error))?;

    info!(
        archive = %path.display(),
        member = member_name,
        bytes = payload.len(),
        "wrote output archive"
    );
    Ok(())
}

/// Directory receiving the temporary archive; same filesystem as `path`.
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
