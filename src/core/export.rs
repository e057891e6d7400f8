//! Export orchestration: front-end file + sidecar back to the backend.
//!
//! Single-file only. The argument may be absolute or relative; both
//! resolve to the same backend target. Templates are reconstituted by
//! splicing stored fragments into their placeholder positions; other
//! types are copied verbatim, honoring sidecar overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::{AppContext, ExportArgs};
use crate::core::error::WeftError;
use crate::core::sidecar::{self, DIR_KEY, EXT_KEY};
use crate::core::transform::export_template;
use crate::infra::config::{Config, ContentType, load_config};
use crate::infra::io;

pub fn run(args: ExportArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;

    match export_one(&config, &args.file, ctx) {
        Ok(target) => {
            if !ctx.quiet {
                if ctx.dry_run {
                    println!(
                        "{} would export {} -> {}",
                        "DRY RUN:".yellow(),
                        args.file.display(),
                        target.display()
                    );
                } else {
                    println!(
                        "{} exported {} -> {}",
                        "✓".green(),
                        args.file.display(),
                        target.display()
                    );
                }
            }
            Ok(())
        }
        Err(err) => match err.downcast_ref::<WeftError>() {
            // Expected validation failure: log and return cleanly
            Some(we) => {
                eprintln!("{} {we}", "Error:".red());
                Ok(())
            }
            None => Err(err),
        },
    }
}

/// Export one front-end file; returns the backend target path.
fn export_one(config: &Config, file: &Path, ctx: &AppContext) -> Result<PathBuf> {
    if !file.is_file() {
        return Err(
            WeftError::UserInput(format!("no such file: {}", file.display())).into()
        );
    }

    let (ty, rel) = classify(config, file)?;
    let defaults = config.defaults_for(ty);

    let sidecar_path = io::with_ext(file, "yml");
    let doc = sidecar::load(&sidecar_path)?;

    // Directory: local override -> configured default + mirrored nesting
    let nested = rel.parent().unwrap_or_else(|| Path::new(""));
    let resolved_dir = doc
        .get(DIR_KEY)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&defaults.dir).join(nested));

    // Extension: local override -> configured default; an empty
    // configured extension keeps the file's own (non-template types).
    let own_ext = file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let resolved_ext = doc.get(EXT_KEY).cloned().unwrap_or_else(|| match ty {
        ContentType::Templates => defaults.ext.clone(),
        _ if defaults.ext.is_empty() => own_ext.clone(),
        _ => defaults.ext.clone(),
    });

    let stem = file
        .file_stem()
        .ok_or_else(|| WeftError::UserInput(format!("{} has no file name", file.display())))?
        .to_string_lossy()
        .into_owned();

    let target = resolved_dir.join(format!("{stem}{resolved_ext}"));

    match ty {
        ContentType::Templates => {
            let front_text = io::read_text(file)?;
            let body = export_template(&front_text, &doc)?;

            if !ctx.dry_run {
                io::write_text(&target, &body)?;
            }
        }
        _ => {
            if !ctx.dry_run {
                io::copy_verbatim(file, &target)
                    .with_context(|| format!("Failed to export {}", file.display()))?;
            }
        }
    }

    tracing::info!(ty = ty.name(), target = %target.display(), "exported");
    Ok(target)
}

/// Map a front-end path (absolute or relative) to its content type and
/// its path relative to the type root.
fn classify(config: &Config, file: &Path) -> Result<(ContentType, PathBuf)> {
    let rel = front_relative(config, file)?;

    let mut components = rel.components();
    let first = components
        .next()
        .ok_or_else(|| {
            WeftError::UserInput(format!(
                "{} is the front-end root itself, not a file under it",
                file.display()
            ))
        })?
        .as_os_str()
        .to_string_lossy()
        .into_owned();

    let ty = ContentType::ALL
        .into_iter()
        .find(|t| t.front_dir() == first)
        .ok_or_else(|| {
            WeftError::UserInput(format!(
                "{} is not under a known type root (assets, scripts, styles, templates)",
                file.display()
            ))
        })?;

    Ok((ty, components.collect()))
}

/// Normalize a path to be relative to the configured front-end root.
/// Canonicalizes both sides so absolute and relative arguments agree.
fn front_relative(config: &Config, file: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;

    let root = cwd.join(&config.front_root);
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let abs = if file.is_absolute() { file.to_path_buf() } else { cwd.join(file) };
    let abs = dunce::canonicalize(&abs).unwrap_or(abs);

    abs.strip_prefix(&root).map(Path::to_path_buf).map_err(|_| {
        WeftError::UserInput(format!(
            "{} is outside the front-end root {}",
            file.display(),
            config.front_root.display()
        ))
        .into()
    })
}
