//! Filesystem and filename helpers

use std::io;
use std::path::Path;

/// Extract the date stamp from a landing file name like
/// `transactions_20240115.csv`.
///
/// Returns the 8-digit stamp (`"20240115"`) or `None` if the name does not
/// follow the `<entity>_<YYYYMMDD>.<ext>` convention.
pub fn file_date(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let (_, stamp) = stem.rsplit_once('_')?;

    if stamp.len() == 8 && stamp.bytes().all(|b| b.is_ascii_digit()) {
        Some(stamp.to_string())
    } else {
        None
    }
}

/// Create a directory (and parents) if it does not exist.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}
