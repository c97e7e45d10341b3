use crate::{
    errors::{FileOperation, IoError},
    parser::Structure,
};
use colored::Colorize;
use miette::Diagnostic;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MaterializeError {
    #[error("I/O error while materializing the tree")]
    #[diagnostic(code(treeforge::materialize::io))]
    Io(#[from] IoError),
}

/// Bare names treated as directories even without a trailing slash.
const DIRECTORY_NAMES: [&str; 5] = ["src", "test", "benchmarks", "examples", "docs"];

/// What to do when a file entry already exists on disk.
///
/// `Overwrite` truncates it to empty, `Preserve` leaves it untouched and
/// reports a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnExisting {
    #[default]
    Overwrite,
    Preserve,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializeOptions {
    pub on_existing: OnExisting,
    /// Report every entry without touching the filesystem.
    pub dry_run: bool,
}

/// Classifies an entry name as directory or file: a trailing slash wins,
/// otherwise the name is checked case-insensitively against a small
/// allow-list of conventional directory names.
pub fn is_directory_entry(name: &str) -> bool {
    name.ends_with('/')
        || DIRECTORY_NAMES
            .iter()
            .any(|known| name.eq_ignore_ascii_case(known))
}

/// Creates the parsed hierarchy under `output_base` and returns the
/// generated root path.
///
/// Entries are visited strictly in parser order so that parents exist
/// before their children. Failures are terminal: entries already written
/// stay on disk, nothing is rolled back.
///
/// # Errors
///
/// Returns a [`MaterializeError`] when a directory cannot be created or an
/// empty file cannot be written for a reason other than already existing.
pub fn materialize(
    structure: &Structure,
    output_base: &Path,
    options: &MaterializeOptions,
) -> Result<PathBuf, MaterializeError> {
    let root = output_base.join(&structure.root_dir);

    create_directory(&root, options)?;

    for entry in &structure.entries {
        let target = root.join(&entry.path);

        if is_directory_entry(&entry.name) {
            create_directory(&target, options)?;
        } else {
            create_file(&target, options)?;
        }
    }

    Ok(root)
}

fn create_directory(path: &Path, options: &MaterializeOptions) -> Result<(), MaterializeError> {
    if !options.dry_run {
        fs::create_dir_all(path)
            .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))?;
    }

    report("create", path);

    Ok(())
}

fn create_file(path: &Path, options: &MaterializeOptions) -> Result<(), MaterializeError> {
    if options.on_existing == OnExisting::Preserve && path.exists() {
        log::debug!("preserving existing file: {}", path.display());

        let msg = format!("{} {}", "skip".yellow(), path.display());

        println!("{}", &msg);

        return Ok(());
    }

    if !options.dry_run {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                IoError::new(FileOperation::Mkdir, parent.to_path_buf(), error)
            })?;
        }

        fs::write(path, "")
            .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;
    }

    report("create", path);

    Ok(())
}

fn report(action: &str, path: &Path) {
    let msg = format!("{} {}", action.green(), path.display());

    println!("{}", &msg);
}
