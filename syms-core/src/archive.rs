// syms-core/src/archive.rs
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use syms_common::error::{Result, SymsError};
use tracing::{debug, warn};
use zip::read::ZipArchive;

/// Reads and unpacks symbol archives.
pub trait ArchiveCodec {
    /// Unpacks every entry of `archive_path` into `dest_dir`. A trusted unpack
    /// writes entries exactly as named; an untrusted one skips entries that
    /// would land outside `dest_dir`.
    fn unpack(&self, archive_path: &Path, dest_dir: &Path, trusted: bool) -> Result<()>;

    fn entry_names(&self, archive_path: &Path) -> Result<Vec<String>>;

    /// Writes the single entry `entry_name` to `dest_path`.
    fn extract_entry(&self, archive_path: &Path, entry_name: &str, dest_path: &Path)
        -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ZipCodec;

fn open_archive(archive_path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive_path).map_err(|e| {
        SymsError::Io(Arc::new(io::Error::new(
            e.kind(),
            format!("Failed to open archive {}: {}", archive_path.display(), e),
        )))
    })?;
    ZipArchive::new(file).map_err(|e| {
        SymsError::Archive(format!(
            "Failed to open ZIP {}: {}",
            archive_path.display(),
            e
        ))
    })
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                SymsError::Io(Arc::new(io::Error::new(
                    e.kind(),
                    format!("Failed create dir {}: {}", parent.display(), e),
                )))
            })?;
        }
    }
    Ok(())
}

impl ZipCodec {
    fn unpack_entries<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        dest_dir: &Path,
        trusted: bool,
        archive_path_for_log: &Path,
    ) -> Result<()> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(|e| {
                SymsError::Archive(format!(
                    "Error reading ZIP index {} in {}: {}",
                    i,
                    archive_path_for_log.display(),
                    e
                ))
            })?;

            let relative: PathBuf = if trusted {
                PathBuf::from(file.name())
            } else {
                match file.enclosed_name() {
                    Some(p) => p.to_path_buf(),
                    None => {
                        debug!("Skipping unsafe ZIP entry name {}", file.name());
                        continue;
                    }
                }
            };
            let target = dest_dir.join(&relative);

            if file.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            create_parent(&target)?;

            #[cfg(unix)]
            if file.is_symlink() {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)?;
                let link_target = PathBuf::from(String::from_utf8_lossy(&buf).to_string());
                if target.symlink_metadata().is_ok() {
                    fs::remove_file(&target)?;
                }
                std::os::unix::fs::symlink(&link_target, &target)?;
                debug!(
                    "Created symlink {} -> {}",
                    target.display(),
                    link_target.display()
                );
                continue;
            }

            let mut out = File::create(&target)?;
            io::copy(&mut file, &mut out)?;

            #[cfg(unix)]
            if let Some(mode) = file.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(&target, fs::Permissions::from_mode(mode)) {
                    warn!("Failed to set mode on {}: {}", target.display(), e);
                }
            }
        }
        Ok(())
    }
}

impl ArchiveCodec for ZipCodec {
    fn unpack(&self, archive_path: &Path, dest_dir: &Path, trusted: bool) -> Result<()> {
        debug!(
            "Unpacking '{}' into '{}' (trusted={})",
            archive_path.display(),
            dest_dir.display(),
            trusted
        );
        fs::create_dir_all(dest_dir)?;
        let mut archive = open_archive(archive_path)?;
        Self::unpack_entries(&mut archive, dest_dir, trusted, archive_path)
    }

    fn entry_names(&self, archive_path: &Path) -> Result<Vec<String>> {
        let archive = open_archive(archive_path)?;
        Ok(archive.file_names().map(str::to_string).collect())
    }

    fn extract_entry(
        &self,
        archive_path: &Path,
        entry_name: &str,
        dest_path: &Path,
    ) -> Result<()> {
        let mut archive = open_archive(archive_path)?;
        let mut file = archive.by_name(entry_name).map_err(|e| {
            SymsError::Archive(format!(
                "Entry '{}' not readable in {}: {}",
                entry_name,
                archive_path.display(),
                e
            ))
        })?;
        create_parent(dest_path)?;
        let mut out = File::create(dest_path)?;
        io::copy(&mut file, &mut out)?;
        debug!("Extracted '{}' to {}", entry_name, dest_path.display());
        Ok(())
    }
}
