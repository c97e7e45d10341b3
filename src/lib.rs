//! Turns tree-drawn text (the output style of common `tree` listing tools)
//! into real directories and empty files on disk.
//!
//! [`parser::Structure`] is the pure core: it converts the text into a root
//! name plus an ordered list of `{depth, name, path}` entries, inferring
//! depth from '│' continuation glyphs. [`materialize`] is the thin I/O
//! layer that walks those entries in order and issues the filesystem calls.

pub mod api;
pub mod errors;
pub mod materialize;
pub mod parser;

pub use api::{generate, GenerateOptions, TreeforgeError};
