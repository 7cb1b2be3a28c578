//! Whole-file reads with error classification

use std::fs;
use std::io;
use std::path::Path;

use log::{error, trace};

use crate::error::{AssetError, Result};

/// Read an entire file into memory
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(AssetError::InvalidArgs("empty path".to_string()));
    }

    let data = fs::read(path).map_err(|e| {
        error!("Failed to open file: {}", path.display());
        classify(path, e)
    })?;
    trace!("Loaded file: {} ({} bytes)", path.display(), data.len());
    Ok(data)
}

/// Read an entire UTF-8 text file
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let data = read_file(path)?;
    String::from_utf8(data).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

fn classify(path: &Path, e: io::Error) -> AssetError {
    if e.kind() == io::ErrorKind::NotFound {
        AssetError::NotFound(path.to_path_buf())
    } else {
        AssetError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    }
}
