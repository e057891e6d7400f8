//! Import orchestration: backend files in, front-end files + sidecars out.
//!
//! Per-file state machine: Located -> DirectoryResolved ->
//! (MultiPassExtracted | CopiedVerbatim) -> Written -> Done, with a
//! terminal Skipped when preconditions fail. Expected per-file failures
//! (`WeftError`) are logged and the batch continues; filesystem write
//! failures abort the whole run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::cli::{AppContext, ImportArgs};
use crate::core::engine::EngineKind;
use crate::core::error::WeftError;
use crate::core::sidecar::{self, DIR_KEY, EXT_KEY, SidecarDoc};
use crate::core::transform::import_template;
use crate::infra::config::{Config, ContentType, load_config};
use crate::infra::io;
use crate::infra::walk::FileWalker;

/// One file queued for import.
#[derive(Debug, Clone)]
struct Candidate {
    ty: ContentType,

    /// Front-end destination (template, script, style, or asset)
    front: PathBuf,

    /// Directory/extension implied by an explicit source-path argument;
    /// `None` for sweep candidates, whose source is resolved instead.
    implied: Option<Implied>,
}

/// Source location implied by an explicit backend file argument.
#[derive(Debug, Clone)]
struct Implied {
    dir: PathBuf,
    ext: String,
}

/// Terminal state of one file's import.
#[derive(Debug)]
enum Outcome {
    /// Template extracted and written
    Imported { source: PathBuf },

    /// Non-template copied byte-for-byte
    Copied { source: PathBuf },

    /// Backend source absent; soft skip
    Skipped { source: PathBuf },

    /// Dry run; nothing written
    DryRun { source: PathBuf },
}

pub fn run(args: ImportArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let engine = args.engine.unwrap_or(config.engine);

    // Located: explicit argument or discovery sweep, enumerated into a
    // fixed list before any processing starts.
    let candidates = match &args.file {
        Some(file) => {
            let ty = args.only.unwrap_or(ContentType::Templates);
            match candidate_from_source(&config, ty, file) {
                Ok(c) => vec![c],
                Err(e) => {
                    report(&e);
                    return Ok(());
                }
            }
        }
        None => discover(&config, args.only)?,
    };

    let progress = if ctx.quiet || candidates.len() < 2 {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;

    for candidate in &candidates {
        progress.set_message(candidate.front.display().to_string());

        match import_one(&config, engine, candidate, ctx) {
            Ok(outcome) => {
                announce(&outcome, candidate, engine, ctx);
                match outcome {
                    Outcome::Skipped { .. } => skipped += 1,
                    _ => imported += 1,
                }
            }
            Err(err) => match err.downcast_ref::<WeftError>() {
                // Expected per-file failure: log and continue the batch
                Some(we) => {
                    report(we);
                    errors += 1;
                }
                // Unexpected filesystem failure: abort the whole run
                None => return Err(err),
            },
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    if !ctx.quiet && candidates.len() > 1 {
        println!(
            "{} imported {imported} file(s), {skipped} skipped, {errors} error(s)",
            "✓".green()
        );
    }

    Ok(())
}

/// Build the single candidate implied by an explicit backend file path.
fn candidate_from_source(
    config: &Config,
    ty: ContentType,
    source: &Path,
) -> std::result::Result<Candidate, WeftError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| WeftError::UserInput(format!("{} has no file name", source.display())))?
        .to_string_lossy()
        .into_owned();

    let dir = source.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    // Nested structure under the type's default backend root mirrors
    // into the front-end tree; sources elsewhere land at the type root.
    let defaults = config.defaults_for(ty);
    let nested =
        dir.strip_prefix(&defaults.dir).unwrap_or_else(|_| Path::new("")).to_path_buf();

    let front_name = match ty.front_ext() {
        Some(fx) => format!("{stem}.{fx}"),
        None => source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(stem),
    };

    let front = config.front_dir(ty).join(nested).join(front_name);

    Ok(Candidate { ty, front, implied: Some(Implied { dir, ext }) })
}

/// Discovery sweep over the front-end tree, one type root at a time.
/// Sidecar documents are never candidates themselves.
fn discover(config: &Config, only: Option<ContentType>) -> Result<Vec<Candidate>> {
    let walker = FileWalker::new(&["**/*.yml".to_string()])?;
    let mut out = Vec::new();

    for ty in ContentType::ALL {
        if only.is_some_and(|o| o != ty) {
            continue;
        }

        let root = config.front_dir(ty);
        if !root.is_dir() {
            continue;
        }

        let files = walker.walk_with_filter(&root, |p| match ty.front_ext() {
            Some(fx) => p.extension().is_some_and(|e| e == fx),
            None => true,
        });

        out.extend(files.into_iter().map(|front| Candidate { ty, front, implied: None }));
    }

    Ok(out)
}

/// Import one candidate through the full state machine.
fn import_one(
    config: &Config,
    engine: EngineKind,
    candidate: &Candidate,
    ctx: &AppContext,
) -> Result<Outcome> {
    let Candidate { ty, front, implied } = candidate;
    let defaults = config.defaults_for(*ty);

    // DirectoryResolved: precedence local override -> implied/global ->
    // nested-path inference under the configured backend root.
    let rel = front.strip_prefix(config.front_dir(*ty)).unwrap_or(front.as_path());
    let nested = rel.parent().unwrap_or_else(|| Path::new(""));
    let default_dir = Path::new(&defaults.dir).join(nested);

    let own_ext = front
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    // Templates always fall back to the configured extension; other
    // types with an empty configured extension keep the file's own.
    let default_ext = match ty {
        ContentType::Templates => defaults.ext.clone(),
        _ if defaults.ext.is_empty() => own_ext.clone(),
        _ => defaults.ext.clone(),
    };

    let sidecar_path = io::with_ext(front, "yml");
    let prior = sidecar::load(&sidecar_path)?;

    // Conflict policy: a hand-authored local override wins over a batch
    // import; a contradictory operation rejects the file outright.
    if let (Some(local), Some(imp)) = (prior.get(DIR_KEY), implied.as_ref()) {
        if Path::new(local) != imp.dir {
            return Err(WeftError::Conflict {
                file: front.clone(),
                key: DIR_KEY,
                local: local.clone(),
                implied: imp.dir.display().to_string(),
            }
            .into());
        }
    }
    if let (Some(local), Some(imp)) = (prior.get(EXT_KEY), implied.as_ref()) {
        if *local != imp.ext {
            return Err(WeftError::Conflict {
                file: front.clone(),
                key: EXT_KEY,
                local: local.clone(),
                implied: imp.ext.clone(),
            }
            .into());
        }
    }

    let resolved_dir = prior
        .get(DIR_KEY)
        .map(PathBuf::from)
        .or_else(|| implied.as_ref().map(|i| i.dir.clone()))
        .unwrap_or_else(|| default_dir.clone());

    let resolved_ext = prior
        .get(EXT_KEY)
        .cloned()
        .or_else(|| implied.as_ref().map(|i| i.ext.clone()))
        .unwrap_or_else(|| default_ext.clone());

    let stem = front
        .file_stem()
        .ok_or_else(|| WeftError::UserInput(format!("{} has no file name", front.display())))?
        .to_string_lossy()
        .into_owned();

    let source = resolved_dir.join(format!("{stem}{resolved_ext}"));

    if !source.is_file() {
        if implied.is_some() {
            return Err(WeftError::UserInput(format!(
                "source file not found: {}",
                source.display()
            ))
            .into());
        }
        // Sweep candidate without a backend counterpart: soft skip
        tracing::debug!(source = %source.display(), "no backend source, skipping");
        return Ok(Outcome::Skipped { source });
    }

    // Overrides are written first, and only when they diverge from the
    // defaults for this file.
    let mut doc = SidecarDoc::new();
    if resolved_dir != default_dir {
        doc.push(DIR_KEY, &resolved_dir.display().to_string());
    }
    if resolved_ext != default_ext {
        doc.push(EXT_KEY, &resolved_ext);
    }

    match ty {
        ContentType::Templates => {
            // MultiPassExtracted: all passes run before anything is
            // written, so a failed pass leaves no partial artifacts.
            let raw = io::read_text(&source)?;
            let front_text = import_template(&raw, engine, &mut doc)?;

            if ctx.dry_run {
                return Ok(Outcome::DryRun { source });
            }

            io::write_text(front, &front_text)?;
            if doc.is_empty() {
                // A rebuilt empty document retires any sidecar left over
                // from a previous import.
                io::remove_if_exists(&sidecar_path)?;
            } else {
                io::write_text(&sidecar_path, doc.as_str())?;
            }

            tracing::info!(
                engine = engine.name(),
                ty = ty.name(),
                source = %source.display(),
                "imported template"
            );
            Ok(Outcome::Imported { source })
        }
        _ => {
            // CopiedVerbatim: assets, scripts, and styles carry no
            // extractable tags; only override keys are persisted.
            if ctx.dry_run {
                return Ok(Outcome::DryRun { source });
            }

            io::copy_verbatim(&source, front)
                .with_context(|| format!("Failed to import {}", source.display()))?;
            if doc.is_empty() {
                io::remove_if_exists(&sidecar_path)?;
            } else {
                io::write_text(&sidecar_path, doc.as_str())?;
            }

            tracing::info!(ty = ty.name(), source = %source.display(), "copied verbatim");
            Ok(Outcome::Copied { source })
        }
    }
}

fn announce(outcome: &Outcome, candidate: &Candidate, engine: EngineKind, ctx: &AppContext) {
    if ctx.quiet {
        return;
    }

    match outcome {
        Outcome::Imported { source } => println!(
            "{} imported {} <- {} ({})",
            "✓".green(),
            candidate.front.display(),
            source.display(),
            engine.name()
        ),
        Outcome::Copied { source } => println!(
            "{} copied {} <- {} ({})",
            "✓".green(),
            candidate.front.display(),
            source.display(),
            candidate.ty.name()
        ),
        Outcome::Skipped { source } => println!(
            "{} skipped {} (no source at {})",
            "-".yellow(),
            candidate.front.display(),
            source.display()
        ),
        Outcome::DryRun { source } => println!(
            "{} would import {} <- {}",
            "DRY RUN:".yellow(),
            candidate.front.display(),
            source.display()
        ),
    }
}

fn report(err: &WeftError) {
    eprintln!("{} {err}", "Error:".red());
}
