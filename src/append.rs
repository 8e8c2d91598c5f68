// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Seeding a writer with an existing archive's central directory.
//!
//! Appending never rewrites existing bytes. Every record of the existing directory is kept in order, and a name
//! index resolves each name to its latest record; earlier records with the same name stay on disk but are shadowed.

use crate::entry::{StoredZipEntry, ZipEntry};
use crate::error::Result;
use crate::io::ReadAt;
use crate::read::iter::DirectoryIterator;
use crate::string::ZipString;

use std::collections::HashMap;

/// The state handed to [`ZipFileWriter::append()`](crate::write::ZipFileWriter::append).
#[derive(Clone, Debug, Default)]
pub struct AppendSession {
    pub(crate) entries: Vec<StoredZipEntry>,
    pub(crate) names: HashMap<Vec<u8>, usize>,
    pub(crate) write_cursor: u64,
    pub(crate) comment: ZipString,
}

impl AppendSession {
    /// Drains `iterator` from its first record, recording every entry and the latest index of each name.
    ///
    /// The iterator is reset before draining. Any error aborts the build; no partial session is returned.
    #[tracing::instrument(skip(iterator))]
    pub fn build<R: ReadAt>(iterator: &mut DirectoryIterator<R>, archive_size: u64) -> Result<Self> {
        iterator.reset()?;

        let mut session = AppendSession::empty(archive_size);
        session.comment = iterator.comment().clone();

        while let Some(entry) = iterator.next_entry()? {
            session.push(entry);
        }

        tracing::debug!(records = session.entries.len(), names = session.names.len(), "built append session");
        Ok(session)
    }

    /// A session for a new archive, or for one with no entries, whose next write lands at `write_cursor`.
    pub fn empty(write_cursor: u64) -> Self {
        Self { write_cursor, ..Default::default() }
    }

    /// Appends an entry, making it the one its name resolves to. Returns its index.
    pub(crate) fn push(&mut self, entry: ZipEntry) -> usize {
        let index = self.entries.len();
        self.names.insert(entry.filename().as_bytes().to_vec(), index);
        self.entries.push(StoredZipEntry::from(entry));
        index
    }

    /// Returns every entry in the order its record was stored, shadowed ones included.
    pub fn entries(&self) -> &[StoredZipEntry] {
        &self.entries
    }

    /// Returns the index of the latest entry with this name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_of_bytes(name.as_bytes())
    }

    /// Returns the index of the latest entry with this raw name.
    pub fn index_of_bytes(&self, name: &[u8]) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Returns the latest entry with this name.
    pub fn get(&self, name: &str) -> Option<&StoredZipEntry> {
        self.index_of(name).and_then(|index| self.entries.get(index))
    }

    /// Returns whether the entry at `index` is the one its name resolves to.
    pub fn is_live(&self, index: usize) -> bool {
        match self.entries.get(index) {
            Some(stored) => self.index_of_bytes(stored.entry.filename().as_bytes()) == Some(index),
            None => false,
        }
    }

    /// Returns the entries which aren't shadowed by a later entry of the same name, in stored order.
    pub fn live_entries(&self) -> impl Iterator<Item = &StoredZipEntry> + '_ {
        self.entries.iter().enumerate().filter(|(index, _)| self.is_live(*index)).map(|(_, stored)| stored)
    }

    /// Returns the offset at which the next byte will be written.
    pub fn write_cursor(&self) -> u64 {
        self.write_cursor
    }

    /// Returns the comment of the archive the session was built from.
    pub fn comment(&self) -> &ZipString {
        &self.comment
    }

    /// Returns the number of stored entries, shadowed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
