use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading the structure file")]
    Read,
    #[error("creating a directory")]
    Mkdir,
    #[error("writing an empty file")]
    Write,
}

#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} at '{path}'")]
#[diagnostic(
    code(treeforge::io),
    help("Check that the path exists, is writable, and does not collide with a file of the same name.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}
