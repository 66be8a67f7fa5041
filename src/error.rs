//! The error taxonomy shared by the archive codec and the rvdata2 transcoder.
use std::path::PathBuf;

/// Errors that can occur while reading, writing, or converting RPG Maker assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive's magic header did not match any known RGSSAD family signature.
    #[error("header mismatch: expected RGSSAD magic, found {found:#x}")]
    HeaderMismatch {
        /// The raw value actually read from the header.
        found: u32,
    },

    /// The header declared a version this codec does not implement.
    #[error("unsupported archive version: {0}")]
    UnsupportedVersion(u8),

    /// The stream ended before a structure that was declared complete could be read.
    #[error("truncated input: expected at least {expected} more bytes, found {found}")]
    TruncatedInput {
        /// How many bytes the structure still needed.
        expected: usize,
        /// How many bytes were actually available.
        found: usize,
    },

    /// A decrypted entry name length was absurd (zero, or larger than the remaining stream).
    #[error("invalid name length: {0}")]
    InvalidNameLength(u32),

    /// The path given to `pack` is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The regular expression given as an unpack filter failed to compile.
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidFilter {
        /// The pattern the user supplied.
        pattern: String,
        /// The underlying regex compiler error.
        #[source]
        source: fancy_regex::Error,
    },

    /// The CLI was invoked with a command name it does not recognize.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A ValueTree node did not have the shape a schema projector expected.
    #[error("unexpected value shape in {context}: {detail}")]
    UnexpectedShape {
        /// Where the mismatch was noticed, e.g. an entity name or field path.
        context: String,
        /// A short description of what was expected.
        detail: String,
    },

    /// An underlying IO operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience alias matching the crate's error taxonomy.
pub type Result<T> = std::result::Result<T, Error>;
