// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A Result type alias over ZipError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

#[derive(Debug, PartialEq, Eq)]
pub enum Zip64ErrorCase {
    TooManyFiles,
    LargeFile,
}

impl Display for Zip64ErrorCase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyFiles => write!(f, "More than 65535 files in archive"),
            Self::LargeFile => write!(f, "File is larger than 4 GiB"),
        }
    }
}

/// An enum of possible errors and their descriptions.
///
/// Running out of central directory records is not an error: it is reported as `Ok(None)` by
/// [`DirectoryIterator::next_entry()`](crate::read::iter::DirectoryIterator::next_entry).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unable to locate the end of central directory record")]
    NotAZipArchive,
    #[error("malformed record: {0}")]
    MalformedRecord(&'static str),
    #[error("encountered an unexpected header (actual: {actual:#x}, expected: {expected:#x})")]
    UnexpectedSignature { actual: u32, expected: u32 },
    #[error("the upstream reader ended in the middle of a record")]
    UnexpectedEndOfInput,
    #[error("an upstream reader returned an error: {0}")]
    Io(#[source] std::io::Error),

    #[error("feature not supported: '{0}'")]
    FeatureNotSupported(&'static str),
    #[error("compression not supported: {0}")]
    CompressionNotSupported(u16),
    #[error("string is not utf-8")]
    StringNotUtf8,

    #[error("file name is too large to be stored in a ZIP record")]
    FileNameTooLarge,
    #[error("comment is too large to be stored in a ZIP record")]
    CommentTooLarge,
    #[error("extra field is too large to be stored in a ZIP record")]
    ExtraFieldTooLarge,
    #[error("zip64 is required but has been disabled: {0}")]
    Zip64Needed(Zip64ErrorCase),
}

impl ZipError {
    /// Returns whether this error stems from the archive's bytes rather than the environment.
    ///
    /// Truncation part-way through a record is grouped with the other format errors.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ZipError::MalformedRecord(_) | ZipError::UnexpectedSignature { .. } | ZipError::UnexpectedEndOfInput
        )
    }
}

impl From<std::io::Error> for ZipError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::UnexpectedEof => ZipError::UnexpectedEndOfInput,
            _ => ZipError::Io(error),
        }
    }
}
