//! Configuration: front-end root, default engine, and per-type backend
//! directory/extension defaults.
//!
//! Loaded once per run and passed read-only into the orchestrators, so
//! the transform core stays testable without process-wide setup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::engine::EngineKind;

/// The four content types mapped between the front-end and backend trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Assets,
    Scripts,
    Styles,
    Templates,
}

impl ContentType {
    /// All types, in the order the discovery sweep visits them.
    pub const ALL: [ContentType; 4] =
        [ContentType::Assets, ContentType::Scripts, ContentType::Styles, ContentType::Templates];

    /// Fixed subdirectory name under the front-end root.
    pub fn front_dir(self) -> &'static str {
        match self {
            ContentType::Assets => "assets",
            ContentType::Scripts => "scripts",
            ContentType::Styles => "styles",
            ContentType::Templates => "templates",
        }
    }

    /// Front-end file extension for sweep filtering; templates only.
    /// Other types accept any extension.
    pub fn front_ext(self) -> Option<&'static str> {
        match self {
            ContentType::Templates => Some("hbs"),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.front_dir()
    }
}

/// Backend defaults for one content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefaults {
    /// Backend root directory for this type
    pub dir: String,

    /// Backend file extension including the dot; empty means "keep the
    /// file's own extension"
    pub ext: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Front-end source root containing assets/scripts/styles/templates
    #[serde(default = "default_front_root")]
    pub front_root: PathBuf,

    /// Default backend engine for template imports
    #[serde(default = "default_engine")]
    pub engine: EngineKind,

    #[serde(default = "default_assets")]
    pub assets: TypeDefaults,

    #[serde(default = "default_scripts")]
    pub scripts: TypeDefaults,

    #[serde(default = "default_styles")]
    pub styles: TypeDefaults,

    #[serde(default = "default_templates")]
    pub templates: TypeDefaults,
}

fn default_front_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_engine() -> EngineKind {
    EngineKind::Erb
}

fn default_assets() -> TypeDefaults {
    TypeDefaults { dir: "backend/assets".to_string(), ext: String::new() }
}

fn default_scripts() -> TypeDefaults {
    TypeDefaults { dir: "backend/scripts".to_string(), ext: ".js".to_string() }
}

fn default_styles() -> TypeDefaults {
    TypeDefaults { dir: "backend/styles".to_string(), ext: ".css".to_string() }
}

fn default_templates() -> TypeDefaults {
    TypeDefaults { dir: "backend/views".to_string(), ext: ".erb".to_string() }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            front_root: default_front_root(),
            engine: default_engine(),
            assets: default_assets(),
            scripts: default_scripts(),
            styles: default_styles(),
            templates: default_templates(),
        }
    }
}

impl Config {
    /// Backend defaults for one content type.
    pub fn defaults_for(&self, ty: ContentType) -> &TypeDefaults {
        match ty {
            ContentType::Assets => &self.assets,
            ContentType::Scripts => &self.scripts,
            ContentType::Styles => &self.styles,
            ContentType::Templates => &self.templates,
        }
    }

    /// Front-end directory for one content type.
    pub fn front_dir(&self, ty: ContentType) -> PathBuf {
        self.front_root.join(ty.front_dir())
    }
}

pub fn load_config() -> Result<Config> {
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["weft.toml", "weft.yaml", "weft.json", ".weft.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with WEFT_ prefix
    builder = builder.add_source(config::Environment::with_prefix("WEFT").separator("__"));

    let cfg = builder.build().context("Failed to load configuration")?;
    let parsed: Config = cfg.try_deserialize().context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let config_path = args.path.join("weft.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
