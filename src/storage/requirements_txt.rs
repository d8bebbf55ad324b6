//! Reading and writing flat `requirements.txt` files.
//!
//! The files handled here are the output of `pip compile`-style resolvers:
//! one unindented line per pinned package, followed by indented continuation
//! lines (hashes, `# via` annotations). Blocks are kept byte-for-byte so that
//! rewriting a file never alters a pin.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

use non_empty_string::NonEmptyString;

use crate::domain::{Identifier, Requirements};

/// Parses a flat requirements file.
///
/// Blank lines, comments and `-r` include directives before the first
/// requirement are dropped. An unindented line starts a new entry; an
/// indented or whitespace-only line belongs to the entry above it.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedIndentation`] if an indented line appears
/// before any requirement, or [`ParseError::Io`] if the reader fails.
pub fn read<R: BufRead>(reader: &mut R) -> Result<Requirements, ParseError> {
    let mut requirements = Requirements::new();
    let mut current: Option<Identifier> = None;
    let mut buf = String::new();
    let mut number = 0;

    loop {
        reader.read_line(&mut buf)?;
        // read_line only leaves the buffer empty at end of input
        let Ok(line) = NonEmptyString::new(std::mem::take(&mut buf)) else {
            break;
        };
        number += 1;
        let text = line.as_str();

        match &current {
            None if is_preamble(text) => {}
            None if is_indented(text) => {
                return Err(ParseError::UnexpectedIndentation { line: number });
            }
            Some(identifier) if is_indented(text) || text.trim().is_empty() => {
                requirements.append(identifier.clone(), text);
            }
            _ => {
                let identifier = Identifier::new(line.clone());
                requirements.append(identifier.clone(), text);
                current = Some(identifier);
            }
        }
    }

    Ok(requirements)
}

/// Lines skipped before the first requirement.
fn is_preamble(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || (!is_indented(line) && is_include(trimmed))
}

fn is_include(line: &str) -> bool {
    ["-r ", "--requirement ", "--requirement="]
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Loads and parses the requirements file at `path`.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is
/// malformed.
pub fn load(path: &Path) -> Result<Requirements, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    read(&mut BufReader::new(file)).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders a requirements file.
///
/// The output is a header comment naming `generator`, one `-r` line per
/// include, a blank line, then every entry's block in order.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write<W: Write>(
    writer: &mut W,
    generator: &str,
    includes: &[String],
    requirements: &Requirements,
) -> io::Result<()> {
    writeln!(writer, "# This file was autogenerated via {generator}")?;
    for include in includes {
        writeln!(writer, "-r {include}")?;
    }
    writeln!(writer)?;
    for (_, block) in requirements.iter() {
        writer.write_all(block.as_bytes())?;
    }
    writer.flush()
}

/// Writes a requirements file to `path`, replacing any existing file.
///
/// Each of `parents` is referenced with an `-r` line, relative to the
/// directory containing `path`.
///
/// # Errors
///
/// Returns an error if the file (or its directory) cannot be created or
/// written to.
pub fn save(
    path: &Path,
    generator: &str,
    parents: &[&Path],
    requirements: &Requirements,
) -> Result<(), SaveError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let includes: Vec<String> = parents
        .iter()
        .map(|parent| include_path(parent, dir))
        .collect();

    let io_error = |source: io::Error| SaveError {
        path: path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_error)?;
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, generator, &includes, requirements).map_err(io_error)
}

/// Expresses `target` relative to `dir`, joined with `/`.
///
/// Components of `dir` not shared with `target` are climbed with `..`.
#[must_use]
pub fn include_path(target: &Path, dir: &Path) -> String {
    let target: Vec<Component<'_>> = target.components().filter(is_significant).collect();
    let dir: Vec<Component<'_>> = dir.components().filter(is_significant).collect();

    let common = target
        .iter()
        .zip(&dir)
        .take_while(|(a, b)| a == b)
        .count();

    std::iter::repeat_n(Cow::Borrowed(".."), dir.len() - common)
        .chain(
            target[common..]
                .iter()
                .map(|component| component.as_os_str().to_string_lossy()),
        )
        .collect::<Vec<_>>()
        .join("/")
}

fn is_significant(component: &Component<'_>) -> bool {
    !matches!(component, Component::CurDir)
}

/// A requirements file could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// An indented line appeared before any requirement line.
    #[error("unexpected indentation on line {line}: continuation before any requirement")]
    UnexpectedIndentation {
        /// 1-based line number.
        line: usize,
    },
    /// The underlying reader failed.
    #[error("failed to read requirements")]
    Io(#[from] io::Error),
}

/// A requirements file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("requirements file {} not found", .0.display())]
    NotFound(PathBuf),
    /// The file could not be opened.
    #[error("failed to open {}", .path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is malformed.
    #[error("failed to parse {}", .path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// What was wrong with it.
        source: ParseError,
    },
}

/// A requirements file could not be written.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {}", .path.display())]
pub struct SaveError {
    /// Path of the file.
    pub path: PathBuf,
    /// Underlying I/O error.
    pub source: io::Error,
}
