// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! # zip_append
//!
//! A ZIP central directory reader with a focus on streaming, and a writer which appends to existing archives.
//!
//! ## Features
//! - Locates the end of central directory record (and its ZIP64 counterpart) from the end of any positioned-read
//!   source, without loading the central directory into memory.
//! - A resettable, forward-only [`DirectoryIterator`] over central directory records.
//! - Append sessions: existing records are kept in place, and entries of the same name are shadowed by later ones.
//! - Support for Stored and Deflate compression when writing.
//! - Aims for resonable [specification](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT) compliance.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! zip_append = { version = "0.1.0", features = ["full"] }
//! ```
//!
//! ### Feature Flags
//! - `full` - Enables all below features.
//! - `chrono` - Enables support for parsing dates via `chrono`.
//! - `deflate` - Enables support for the Deflate compression method when writing.
//!
//! ## Example
//! ```no_run
//! # use zip_append::read::DirectoryIterator;
//! # use zip_append::error::Result;
//! #
//! # fn run() -> Result<()> {
//! let data = std::fs::read("./foo.zip")?;
//! let size = data.len() as i64;
//!
//! let mut iterator = DirectoryIterator::new(data, size)?;
//! let session = iterator.append_session()?;
//!
//! if let Some(index) = session.index_of("bar.txt") {
//!     println!("'bar.txt' resolves to record {index} of {}", session.len());
//! }
//! #   Ok(())
//! # }
//! ```

pub mod append;
pub mod core;
pub mod entry;
pub mod error;
pub mod io;
pub mod read;
pub mod spec;
pub mod write;

pub(crate) mod date;
pub(crate) mod string;
pub(crate) mod utils;


pub use crate::append::AppendSession;
pub use crate::spec::attribute::AttributeCompatibility;
pub use crate::spec::compression::Compression;

pub use crate::date::ZipDateTime;
pub use crate::entry::{builder::ZipEntryBuilder, StoredZipEntry, ZipEntry};
pub use crate::read::DirectoryIterator;
pub use crate::string::{StringEncoding, ZipString};
pub use crate::write::ZipFileWriter;
