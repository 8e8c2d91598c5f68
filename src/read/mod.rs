// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports reading ZIP central directories.
//!
//! Reading starts at the end of an archive: [`locator`] finds the end of central directory record (and its ZIP64
//! counterpart), [`cd`] decodes single central directory records, and [`iter`] ties the two together into a
//! resettable cursor.

pub mod cd;
pub mod iter;
pub mod locator;

pub use iter::{DirectoryIterator, Entries};
pub use locator::EndOfCentralDirectory;
