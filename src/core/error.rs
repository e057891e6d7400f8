//! Per-file error taxonomy for import/export operations.

use std::path::PathBuf;

/// Expected per-file failure modes.
///
/// `UserInput` and `Conflict` are validation outcomes: the caller logs
/// `Error: <message>` and moves on without mutating anything. `Sidecar`
/// is a hard read/parse failure that aborts the current file only; the
/// batch continues with the next candidate.
#[derive(Debug, thiserror::Error)]
pub enum WeftError {
    /// Missing argument, path outside the front-end root, unknown type root
    #[error("{0}")]
    UserInput(String),

    /// A local sidecar override contradicts the operation's implied value
    #[error("{file}: local override {key}: {local} conflicts with implied {implied}; file left untouched", file = .file.display())]
    Conflict {
        /// Front-end file the sidecar belongs to
        file: PathBuf,
        /// Which override key conflicted (`src_dir` or `src_ext`)
        key: &'static str,
        /// Value found in the sidecar document
        local: String,
        /// Value implied by the operation's target path
        implied: String,
    },

    /// Sidecar document could not be read or parsed
    #[error("cannot read sidecar {path}: {source}", path = .path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}
