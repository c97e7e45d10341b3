use crate::{
    materialize::{self, MaterializeOptions, OnExisting},
    parser::{ParseMode, Structure},
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TreeforgeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] crate::parser::ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Materialize(#[from] crate::materialize::MaterializeError),
}

/// Knobs for one generation run. The default matches the classic behavior:
/// lenient parsing, pre-existing files truncated, filesystem written.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub mode: ParseMode,
    pub on_existing: OnExisting,
    pub dry_run: bool,
}

/// Parses the structure file at `structure_file` and materializes the
/// described hierarchy under `output_base`, returning the generated root
/// path.
///
/// # Errors
///
/// Returns a [`TreeforgeError`] if:
///
/// - The structure file cannot be read.
/// - In strict mode, a line is malformed or nests too deep.
/// - A directory or empty file cannot be created.
pub fn generate(
    structure_file: &Path,
    output_base: &Path,
    options: &GenerateOptions,
) -> Result<PathBuf, TreeforgeError> {
    let structure = Structure::from_file(structure_file, options.mode)?;

    log::debug!(
        "parsed {} entries under root '{}'",
        structure.entries.len(),
        structure.root_dir
    );

    let root = materialize::materialize(
        &structure,
        output_base,
        &MaterializeOptions {
            on_existing: options.on_existing,
            dry_run: options.dry_run,
        },
    )?;

    Ok(root)
}
