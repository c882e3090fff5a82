use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes through a sibling temp file and renames it into place so readers
/// never observe a half-written export.
pub(crate) fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path_for(path);
    fs::write(&staging, text.as_bytes())?;
    if let Err(error) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    Ok(())
}

fn staging_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("export");
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
