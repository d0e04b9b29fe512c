//! Whole-file replacement through a sibling temporary file.
//!
//! Readers of the destination see either the previous content or the new
//! content, never a truncated file.

use camino::Utf8Path;
use std::fs::Permissions;
use std::io::Write;

/// Permission bits for ordinary files.
#[cfg(unix)]
pub const REGULAR_MODE: u32 = 0o644;
/// Permission bits for executable files.
#[cfg(unix)]
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Write `bytes` to `path`, replacing any existing file.
///
/// The parent directory must already exist. `permissions` are applied to the
/// new file before it is moved into place.
///
/// # Errors
///
/// Returns any I/O error from creating, writing or persisting the temporary
/// file.
pub fn write_atomically(
    path: &Utf8Path,
    bytes: &[u8],
    permissions: Option<Permissions>,
) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.flush()?;
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Permissions for a newly installed file.
#[cfg(unix)]
#[must_use]
pub fn install_permissions(executable: bool) -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = if executable {
        EXECUTABLE_MODE
    } else {
        REGULAR_MODE
    };
    Some(Permissions::from_mode(mode))
}

/// Permissions for a newly installed file.
#[cfg(not(unix))]
#[must_use]
pub fn install_permissions(_executable: bool) -> Option<Permissions> {
    None
}
