//! Source file discovery
//!
//! Resolves the configured glob patterns against the input root. Both
//! source trees live under the same root:
//! ```text
//! input/
//!   song_data/
//!     A/
//!       B/
//!         C/
//!           TRABCEI128F424C983.json
//!   log_data/
//!     2018/
//!       11/
//!         2018-11-12-events.json
//! ```

use crate::error::{EtlError, Result};
use glob::Pattern;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// The two raw sources of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    SongCatalog,
    ActivityLog,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::SongCatalog => "song_data",
            SourceKind::ActivityLog => "log_data",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// File discovery component for the input root
#[derive(Debug)]
pub struct FileDiscovery {
    input_root: PathBuf,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_root: PathBuf) -> Self {
        Self { input_root }
    }

    /// All regular files matching `pattern` below the input root, sorted by
    /// path. An empty match is an error: the source tree is unusable.
    pub fn discover(&self, source: SourceKind, pattern: &str) -> Result<Vec<PathBuf>> {
        if !self.input_root.is_dir() {
            return Err(EtlError::InputNotFound {
                path: self.input_root.clone(),
            });
        }

        let full_pattern = format!(
            "{}/{}",
            Pattern::escape(&self.input_root.to_string_lossy()),
            pattern.trim_start_matches('/')
        );
        debug!("Searching for {} files with: {}", source, full_pattern);

        let entries = glob::glob(&full_pattern).map_err(|e| EtlError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(EtlError::NoSourceFiles {
                source_name: source.to_string(),
                pattern: full_pattern,
            });
        }

        debug!("Found {} {} files", files.len(), source);
        Ok(files)
    }
}
