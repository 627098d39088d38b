//! Log file handle shared by the file layer

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use crate::logger::error::LoggerError;

/// Opens the log file, creating missing parent directories
///
/// The returned `Mutex<File>` implements `MakeWriter`, so it can be handed
/// straight to `fmt::layer().with_writer(..)`.
pub(crate) fn open_log_file(path: &Path, append: bool) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Mutex::new(options.open(path)?))
}
