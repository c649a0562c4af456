//! Batch conversion of a Dofus game data folder.
//!
//! The data folder holds `common/*.d2o` and `i18n/i18n_<locale>.d2i`. The
//! output folder receives:
//!
//! - `common/<file>.d2o.json` for every container
//! - `translation/<locale>.json` for every translation table
//! - `rust/` with one module per class package plus a `lib.rs`
//!
//! A file that fails to decode is logged and skipped.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dofus_codegen::Registry;
use dofus_data::{d2i, d2o};
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub const COMMON_DIR: &str = "common";
pub const I18N_DIR: &str = "i18n";
pub const TRANSLATION_DIR: &str = "translation";
pub const RUST_DIR: &str = "rust";

/// What to convert and where to.
#[derive(Debug, Clone)]
pub struct Options {
    pub data_dir: PathBuf,
    /// Removed and recreated on every run.
    pub output_dir: PathBuf,
    /// Generate Rust types from the decoded classes.
    pub codegen: bool,
}

/// Counts of processed files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub d2o_parsed: usize,
    pub d2o_failed: usize,
    pub d2i_parsed: usize,
    pub d2i_failed: usize,
    pub modules: usize,
}

/// Converts the whole data folder.
pub fn run(options: &Options) -> Result<Summary> {
    check_data_dir(&options.data_dir)?;
    prepare_output_dir(&options.output_dir, &options.data_dir)?;
    Ok(convert(options))
}

/// Runs the conversion steps into an already prepared output folder.
///
/// A step that fails as a whole is logged and the next one still runs.
pub fn convert(options: &Options) -> Summary {
    let mut summary = Summary::default();
    let mut registry = Registry::new();

    let common = options.data_dir.join(COMMON_DIR);
    match process_common_dir(&common, &options.output_dir.join(COMMON_DIR), &mut registry) {
        Ok((parsed, failed)) => {
            info!(count = parsed, failed, "d2o files parsed");
            summary.d2o_parsed = parsed;
            summary.d2o_failed = failed;
        }
        Err(err) => error!(error = %format!("{err:#}"), "error processing common folder"),
    }

    if options.codegen {
        match export_rust(&registry, &options.output_dir.join(RUST_DIR)) {
            Ok(modules) => {
                info!(count = modules, "rust modules generated");
                summary.modules = modules;
            }
            Err(err) => error!(error = %format!("{err:#}"), "error generating rust modules"),
        }
    }

    let i18n = options.data_dir.join(I18N_DIR);
    match process_i18n_dir(&i18n, &options.output_dir.join(TRANSLATION_DIR)) {
        Ok((parsed, failed)) => {
            info!(count = parsed, failed, "d2i files parsed");
            summary.d2i_parsed = parsed;
            summary.d2i_failed = failed;
        }
        Err(err) => error!(error = %format!("{err:#}"), "error processing i18n folder"),
    }

    summary
}

/// Checks that the data folder and its `common/` and `i18n/` subfolders exist.
pub fn check_data_dir(data_dir: &Path) -> Result<()> {
    for dir in [
        data_dir.to_path_buf(),
        data_dir.join(COMMON_DIR),
        data_dir.join(I18N_DIR),
    ] {
        let meta = fs::metadata(&dir)
            .with_context(|| format!("folder does not exist: {}", dir.display()))?;
        if !meta.is_dir() {
            bail!("not a directory: {}", dir.display());
        }
    }
    Ok(())
}

/// Replaces `output_dir` with an empty tree of output subfolders.
pub fn prepare_output_dir(output_dir: &Path, data_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        let output = output_dir.canonicalize()?;
        let data = data_dir.canonicalize()?;
        if data.starts_with(&output) {
            bail!(
                "output folder {} contains the data folder, refusing to remove it",
                output_dir.display()
            );
        }
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("cannot remove output folder {}", output_dir.display()))?;
    }
    for sub in [COMMON_DIR, RUST_DIR, TRANSLATION_DIR] {
        let dir = output_dir.join(sub);
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create folder {}", dir.display()))?;
    }
    Ok(())
}

/// Decodes every `.d2o` file of `dir` into `out_dir` and registers its
/// classes. Returns the number of converted and failed files.
pub fn process_common_dir(
    dir: &Path,
    out_dir: &Path,
    registry: &mut Registry,
) -> Result<(usize, usize)> {
    let mut parsed = 0;
    let mut failed = 0;
    for path in files_with_extension(dir, "d2o")? {
        let data = match d2o::decode_file(&path) {
            Ok(data) => data,
            Err(err) => {
                error!(file = %path.display(), error = %err, "error parsing file");
                failed += 1;
                continue;
            }
        };
        debug!(
            file = %path.display(),
            classes = data.classes.len(),
            objects = data.objects.len(),
            "file parsed"
        );

        let out = out_dir.join(format!("{}.json", file_name(&path)));
        if let Err(err) = write_json(&out, &data) {
            error!(path = %out.display(), error = %err, "error writing file");
            failed += 1;
            continue;
        }
        registry.add_classes(&data.classes);
        parsed += 1;
    }
    Ok((parsed, failed))
}

/// Decodes every `.d2i` file of `dir` into `out_dir/<locale>.json`.
pub fn process_i18n_dir(dir: &Path, out_dir: &Path) -> Result<(usize, usize)> {
    let mut parsed = 0;
    let mut failed = 0;
    for path in files_with_extension(dir, "d2i")? {
        let name = file_name(&path);
        let table = match d2i::decode_file(&path) {
            Ok(table) => table,
            Err(err) => {
                error!(file = %path.display(), error = %err, "error parsing file");
                failed += 1;
                continue;
            }
        };
        debug!(file = %path.display(), entries = table.len(), "file parsed");

        let out = out_dir.join(format!("{}.json", locale_from_file_name(&name)));
        if let Err(err) = write_json(&out, &table) {
            error!(path = %out.display(), error = %err, "error writing file");
            failed += 1;
            continue;
        }
        parsed += 1;
    }
    Ok((parsed, failed))
}

/// Writes one module per package plus a `lib.rs` declaring them.
pub fn export_rust(registry: &Registry, out_dir: &Path) -> Result<usize> {
    let modules = registry.render();
    let mut written = BTreeSet::new();
    for module in &modules {
        let path = out_dir.join(module.file_name());
        if !written.insert(module.file_name()) {
            warn!(
                package = %module.package,
                path = %path.display(),
                "module name already used, overwriting"
            );
        }
        fs::write(&path, &module.source)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    if !modules.is_empty() {
        let path = out_dir.join("lib.rs");
        fs::write(&path, Registry::render_index(&modules))
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(modules.len())
}

/// `i18n_fr.d2i` → `fr`; other names lose only their extension.
pub fn locale_from_file_name(name: &str) -> &str {
    let stem = name.strip_suffix(".d2i").unwrap_or(name);
    stem.strip_prefix("i18n_").unwrap_or(stem)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Regular files of `dir` with the given extension, sorted by name.
fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            debug!(directory = %path.display(), "skipping directory");
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            debug!(file = %path.display(), "skipping file (wrong extension)");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
