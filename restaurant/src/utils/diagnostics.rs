//! Per-role diagnostics output
//!
//! Each role owns one diagnostics file, truncated at launch. Fatal errors
//! land there as well as in the `tracing` output.

use parking_lot::Mutex;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigError;

pub struct Diagnostics {
    path: PathBuf,
    file: Mutex<File>,
}

impl Diagnostics {
    pub fn create(path: &Path) -> Result<Self, ConfigError> {
        let file = File::create(path).map_err(|source| ConfigError::Diagnostics {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Records a fatal error; write failures are only logged
    pub fn report(&self, role: &str, error: &dyn std::fmt::Display) {
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{role}: {error}") {
            tracing::warn!(path = %self.path.display(), error = %e, "Cannot write diagnostics");
        }
    }
}
