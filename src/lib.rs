//! **weft** - CLI for round-tripping backend template tags (ERB, JSP,
//! HBS, PHP, Twig) through placeholder-based front-end templates.
//!
//! Extracted fragments live in YAML sidecar documents next to the
//! front-end files; export splices them back into reconstituted backend
//! files. The transform core is pure text-in/text-out so it tests
//! without a filesystem.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core engine - scan passes, sidecar codec, transforms, orchestration
pub mod core {
    /// Delimiter table: engine kinds and their ordered scan passes
    pub mod engine;
    pub use engine::{EngineKind, Pass};

    /// Regex-driven fragment scanner
    pub mod scanner;
    pub use scanner::{Found, scan};

    /// Sidecar document codec (quoted keys, block literals, escaping)
    pub mod sidecar;
    pub use sidecar::SidecarDoc;

    /// Comment-wrapped literal handler (structural directive round-trip)
    pub mod literal;

    /// Pure import/export text transforms
    pub mod transform;

    /// Import orchestration (backend -> front-end + sidecar)
    pub mod import;
    pub use import::run as import_run;

    /// Export orchestration (front-end + sidecar -> backend)
    pub mod export;
    pub use export::run as export_run;

    /// Per-file error taxonomy
    pub mod error;
    pub use error::WeftError;
}

/// Infrastructure - configuration, I/O, and discovery walking
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, ContentType, init as config_init, load_config};

    /// Small file I/O helpers
    pub mod io;

    /// Ignore-aware directory walking for the discovery sweep
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{EngineKind, SidecarDoc, WeftError, export_run, import_run};
pub use crate::infra::{Config, ContentType, FileWalker, load_config};
