// Filesystem helpers for placing the tengok binary.
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Makes a file executable (`chmod 755`). Downloaded files never carry
/// the execute bit, so this runs on every staged asset.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    log_debug!("Making {} executable", path.display().to_string().yellow());
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Whether any execute bit is set on `path`.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Moves `from` to `to`, replacing any existing file at `to`.
///
/// A plain `rename` is used when both paths share a filesystem. Across
/// filesystems the bytes are first copied into a temporary file inside the
/// destination directory and then renamed over `to`, so `to` is either the
/// old file or the complete new one, never a partial copy. The source is
/// removed once the new file is in place.
pub fn move_binary(from: &Path, to: &Path) -> io::Result<()> {
    log_debug!(
        "Moving {} to {}",
        from.display().to_string().yellow(),
        to.display().to_string().cyan()
    );

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log_debug!("Cross-device move, copying through the target directory ({})", e);
            copy_then_persist(from, to)?;
            if let Err(e) = fs::remove_file(from) {
                log_warn!("Installed, but could not remove staged copy {}: {}", from.display(), e);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn copy_then_persist(from: &Path, to: &Path) -> io::Result<()> {
    let dir = to
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent directory"))?;

    let mut staged = tempfile::Builder::new().prefix(".tengok.").tempfile_in(dir)?;
    let mut source = fs::File::open(from)?;
    io::copy(&mut source, staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    let permissions = fs::metadata(from)?.permissions();
    fs::set_permissions(staged.path(), permissions)?;

    staged.persist(to).map_err(|e| e.error)?;
    Ok(())
}
