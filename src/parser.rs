use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("I/O error reading structure file")]
    #[diagnostic(code(treeforge::parser::io))]
    Io(#[from] IoError),

    #[error("structure file has no root directory line")]
    #[diagnostic(
        code(treeforge::parser::missing_root),
        help("The first line of a structure file names the root directory, e.g. '/project'.")
    )]
    MissingRoot,

    #[error("line {line_number} is not a valid entry: '{line}'")]
    #[diagnostic(
        code(treeforge::parser::malformed_line),
        help("Entry lines look like '├── name' or '└── name', preceded by one '│' glyph per nesting level.")
    )]
    MalformedLine { line_number: usize, line: String },

    #[error("line {line_number} jumps to depth {found} but only {open} levels are open")]
    #[diagnostic(
        code(treeforge::parser::depth_jump),
        help("An entry can nest at most one level deeper than the entry above it.")
    )]
    DepthJump {
        line_number: usize,
        found: usize,
        open: usize,
    },
}

/// How lines that do not match the branch-marker pattern are treated.
///
/// `Lenient` silently skips them, tolerating stray tree-drawing decoration.
/// `Strict` rejects them with [`ParseError::MalformedLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Lenient,
    Strict,
}

/// Strategy for inferring an entry's nesting depth from the text that
/// precedes its branch glyph.
pub trait DepthInference {
    fn depth_of(&self, prefix: &str) -> usize;
}

/// Default strategy: depth is the number of '│' continuation glyphs before
/// the branch glyph. Indentation width is ignored entirely, so input must
/// carry one continuation glyph per open ancestor level.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphDepth;
impl DepthInference for GlyphDepth {
    fn depth_of(&self, prefix: &str) -> usize {
        prefix.matches('│').count()
    }
}

/// Stricter alternative for canonical input: depth is the indentation width
/// in fixed units of four columns, continuation glyphs counting as one
/// column each.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentDepth;
impl DepthInference for IndentDepth {
    fn depth_of(&self, prefix: &str) -> usize {
        prefix.chars().count() / 4
    }
}

/// One named node of the parsed hierarchy.
///
/// `name` is the trimmed label as it appeared in the source, a trailing
/// directory slash included. `path` is the slash-joined ancestor chain from
/// the root down to this entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub depth: usize,
    pub name: String,
    pub path: String,
}

/// The result of one parse: the root directory name and the entries in
/// source order, parents always ahead of their descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    pub root_dir: String,
    pub entries: Vec<ParsedEntry>,
}

impl Structure {
    /// Reads and parses a structure file from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the file cannot be read, or on whatever
    /// [`Structure::parse`] rejects for the given mode.
    pub fn from_file<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        Self::parse(&content, mode)
    }

    /// Parses tree-drawn text with the default glyph-counting depth
    /// strategy. Pure: no I/O, no logging to stdout.
    pub fn parse(text: &str, mode: ParseMode) -> Result<Self, ParseError> {
        Self::parse_with(text, mode, &GlyphDepth)
    }

    /// Parses tree-drawn text, inferring each entry's depth through the
    /// supplied [`DepthInference`] strategy.
    ///
    /// The first line names the root directory (leading '/' stripped). Each
    /// later line is recognized as an entry only if it consists of
    /// continuation glyphs interleaved with whitespace, one branch glyph,
    /// and a non-empty label. Blank lines are always skipped; other
    /// non-matching lines are skipped or rejected per [`ParseMode`].
    ///
    /// # Errors
    ///
    /// - [`ParseError::MissingRoot`] when the first line is absent or blank.
    /// - [`ParseError::MalformedLine`] in strict mode, for a non-blank line
    ///   that does not match the entry pattern.
    /// - [`ParseError::DepthJump`] in strict mode, when an entry nests more
    ///   than one level deeper than its predecessor.
    pub fn parse_with<D: DepthInference>(
        text: &str,
        mode: ParseMode,
        strategy: &D,
    ) -> Result<Self, ParseError> {
        lazy_static::lazy_static! {
            static ref ENTRY_LINE_REGEX: regex::Regex = regex::Regex::new(
                r"(?x)
                ^
                (?P<prefix>[\s│]*)   # continuation glyphs interleaved with whitespace
                (?:├──|└──)\s*       # exactly one branch glyph
                (?P<label>.*)        # entry label
                $"
            ).expect("a valid regex pattern");
        }

        let mut lines = text.lines();

        let root_dir = lines
            .next()
            .map(str::trim)
            .filter(|first| !first.is_empty())
            .map(|first| first.strip_prefix('/').unwrap_or(first).to_string())
            .ok_or(ParseError::MissingRoot)?;

        let mut path_stack: Vec<String> = Vec::new();
        let mut entries: Vec<ParsedEntry> = Vec::new();
        let mut prev_depth: Option<usize> = None;

        for (index, line) in lines.enumerate() {
            let line_number = index + 2;

            if line.trim().is_empty() {
                continue;
            }

            let recognized = ENTRY_LINE_REGEX
                .captures(line)
                .map(|captures| {
                    let prefix = captures.name("prefix").map_or("", |m| m.as_str());
                    let label = captures.name("label").map_or("", |m| m.as_str());

                    (strategy.depth_of(prefix), label.trim().to_string())
                })
                .filter(|(_, name)| !name.is_empty());

            let Some((mut depth, name)) = recognized else {
                match mode {
                    ParseMode::Strict => {
                        return Err(ParseError::MalformedLine {
                            line_number,
                            line: line.to_string(),
                        })
                    }
                    ParseMode::Lenient => {
                        log::debug!("skipping unrecognized line {}: '{}'", line_number, line);
                        continue;
                    }
                }
            };

            if let Some(prev) = prev_depth {
                if depth <= prev {
                    path_stack.truncate(depth);
                }
            }

            // A jump deeper than one level never names its missing
            // ancestors; strict mode rejects it, lenient mode clamps it to
            // the next open level.
            if depth > path_stack.len() {
                match mode {
                    ParseMode::Strict => {
                        return Err(ParseError::DepthJump {
                            line_number,
                            found: depth,
                            open: path_stack.len(),
                        })
                    }
                    ParseMode::Lenient => {
                        log::debug!(
                            "line {}: clamping depth {} to {}",
                            line_number,
                            depth,
                            path_stack.len()
                        );
                        depth = path_stack.len();
                    }
                }
            }

            if depth == path_stack.len() {
                path_stack.push(name.clone());
            } else {
                path_stack[depth] = name.clone();
            }

            let path = path_stack[..=depth].join("/");

            entries.push(ParsedEntry { depth, name, path });

            prev_depth = Some(depth);
        }

        Ok(Structure { root_dir, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "/project\n\
                          ├── src\n\
                          │   ├── main.go\n\
                          │   └── utils.go\n\
                          └── README.md\n";

    #[test]
    fn test_parse_sample_structure() {
        let structure = Structure::parse(SAMPLE, ParseMode::Lenient).unwrap();

        assert_eq!(structure.root_dir, "project");

        let paths: Vec<&str> = structure
            .entries
            .iter()
            .map(|entry| entry.path.as_str())
            .collect();

        assert_eq!(
            paths,
            vec!["src", "src/main.go", "src/utils.go", "README.md"]
        );
    }

    #[test]
    fn test_depth_equals_glyph_count() {
        let text = "/root\n├── a\n│   ├── b\n│   │   └── c\n";
        let structure = Structure::parse(text, ParseMode::Strict).unwrap();

        let depths: Vec<usize> = structure.entries.iter().map(|entry| entry.depth).collect();

        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn test_stack_truncation_sequence() {
        // depths [0, 1, 2, 1, 0] with labels [A, B, C, D, E]
        let text = "/root\n\
                    ├── A\n\
                    │   ├── B\n\
                    │   │   ├── C\n\
                    │   ├── D\n\
                    └── E\n";
        let structure = Structure::parse(text, ParseMode::Lenient).unwrap();

        let paths: Vec<&str> = structure
            .entries
            .iter()
            .map(|entry| entry.path.as_str())
            .collect();

        assert_eq!(paths, vec!["A", "A/B", "A/B/C", "A/D", "E"]);
    }

    #[test]
    fn test_every_child_has_an_earlier_parent() {
        let text = "/root\n\
                    ├── src\n\
                    │   ├── core\n\
                    │   │   ├── lexer.rs\n\
                    │   │   └── parser.rs\n\
                    │   └── main.rs\n\
                    ├── docs\n\
                    │   └── intro.md\n\
                    └── README.md\n";
        let structure = Structure::parse(text, ParseMode::Strict).unwrap();

        for (position, entry) in structure.entries.iter().enumerate() {
            if entry.depth == 0 {
                continue;
            }
            let ancestor = structure.entries[..position].iter().rev().find(|earlier| {
                earlier.depth == entry.depth - 1
                    && entry.path.starts_with(&format!("{}/", earlier.path))
            });
            assert!(ancestor.is_some(), "no parent found for '{}'", entry.path);
        }
    }

    #[test]
    fn test_blank_and_decoration_lines_are_skipped() {
        let text = "/root\n\n├── a\n│\n   \n│   ├── b\nnot a tree line\n└── c\n";
        let structure = Structure::parse(text, ParseMode::Lenient).unwrap();

        let paths: Vec<&str> = structure
            .entries
            .iter()
            .map(|entry| entry.path.as_str())
            .collect();

        assert_eq!(paths, vec!["a", "a/b", "c"]);
    }

    #[test]
    fn test_strict_mode_rejects_decoration_lines() {
        let text = "/root\n├── a\nnot a tree line\n";
        let error = Structure::parse(text, ParseMode::Strict).unwrap_err();

        assert!(matches!(
            error,
            ParseError::MalformedLine { line_number: 3, .. }
        ));
    }

    #[test]
    fn test_strict_mode_rejects_depth_jump() {
        let text = "/root\n│   │   ├── orphan\n";
        let error = Structure::parse(text, ParseMode::Strict).unwrap_err();

        assert!(matches!(
            error,
            ParseError::DepthJump {
                line_number: 2,
                found: 2,
                open: 0,
            }
        ));
    }

    #[test]
    fn test_lenient_mode_clamps_depth_jump() {
        let text = "/root\n│   │   ├── orphan\n";
        let structure = Structure::parse(text, ParseMode::Lenient).unwrap();

        assert_eq!(structure.entries[0].depth, 0);
        assert_eq!(structure.entries[0].path, "orphan");
    }

    #[test]
    fn test_root_without_leading_separator() {
        let structure = Structure::parse("project\n└── a\n", ParseMode::Strict).unwrap();

        assert_eq!(structure.root_dir, "project");
    }

    #[test]
    fn test_empty_input_is_missing_root() {
        assert!(matches!(
            Structure::parse("", ParseMode::Lenient),
            Err(ParseError::MissingRoot)
        ));
        assert!(matches!(
            Structure::parse("   \n├── a\n", ParseMode::Lenient),
            Err(ParseError::MissingRoot)
        ));
    }

    #[test]
    fn test_trailing_slash_is_preserved_in_name() {
        let structure = Structure::parse("/root\n├── assets/\n", ParseMode::Strict).unwrap();

        assert_eq!(structure.entries[0].name, "assets/");
    }

    #[test]
    fn test_indent_depth_strategy() {
        let text = "/root\n├── a\n    ├── b\n        └── c\n";
        let structure = Structure::parse_with(text, ParseMode::Strict, &IndentDepth).unwrap();

        let paths: Vec<&str> = structure
            .entries
            .iter()
            .map(|entry| entry.path.as_str())
            .collect();

        assert_eq!(paths, vec!["a", "a/b", "a/b/c"]);
    }
}
