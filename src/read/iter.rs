// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A resettable, forward-only cursor over an archive's central directory.

use crate::append::AppendSession;
use crate::entry::ZipEntry;
use crate::error::{Result, ZipError};
use crate::io::{ReadAt, SectionReader};
use crate::read::cd;
use crate::read::locator::{self, EndOfCentralDirectory};
use crate::string::ZipString;

use std::io::{BufReader, Seek, SeekFrom};

/// The maximum capacity of the buffer used to read the central directory (20MiB).
const MAX_CD_BUFFER_SIZE: usize = 20 * 1024 * 1024;

/// The minimum capacity of the buffer used to read the central directory (8KiB).
const MIN_CD_BUFFER_SIZE: usize = 8 * 1024;

/// Iterates over the central directory records of an archive, one [`ZipEntry`] at a time.
///
/// Records are parsed lazily in the order they're stored, so the directory is never held in memory as a whole.
/// Each iterator owns its cursor over the source, so any number of iterators may share one [`ReadAt`] source.
///
/// # Example
/// ```no_run
/// # use zip_append::read::iter::DirectoryIterator;
/// # use zip_append::error::Result;
/// #
/// # fn run() -> Result<()> {
/// let file = std::fs::File::open("./foo.zip")?;
/// let size = file.metadata()?.len() as i64;
/// let mut iterator = DirectoryIterator::new(file, size)?;
///
/// while let Some(entry) = iterator.next_entry()? {
///     println!("{}", entry.filename());
/// }
/// #   Ok(())
/// # }
/// ```
pub struct DirectoryIterator<R> {
    reader: BufReader<SectionReader<R>>,
    end: EndOfCentralDirectory,
    size: u64,
    exhausted: bool,
    yielded: u64,
}

impl<R: ReadAt> DirectoryIterator<R> {
    /// Locates the central directory of the first `size` bytes of `source` and positions the iterator at its first
    /// record.
    ///
    /// A negative size is rejected before the source is read.
    #[tracing::instrument(skip(source))]
    pub fn new(source: R, size: i64) -> Result<Self> {
        let size = u64::try_from(size).map_err(|_| ZipError::InvalidArgument("archive size must not be negative"))?;
        let end = locator::end_of_central_directory(&source, size)?;

        let capacity = usize::try_from(end.directory_size())
            .unwrap_or(MAX_CD_BUFFER_SIZE)
            .clamp(MIN_CD_BUFFER_SIZE, MAX_CD_BUFFER_SIZE);
        let reader = BufReader::with_capacity(capacity, SectionReader::new(source, size));

        let mut iterator = Self { reader, end, size, exhausted: false, yielded: 0 };
        iterator.reset()?;

        Ok(iterator)
    }

    /// Returns the next entry, or `None` once the central directory has been exhausted.
    ///
    /// Once `None` has been returned, further calls keep returning it without reading until [`Self::reset()`] is
    /// called. Errors are returned as-is; the iterator's position within the failing record is then unspecified until
    /// it is reset.
    pub fn next_entry(&mut self) -> Result<Option<ZipEntry>> {
        if self.exhausted {
            return Ok(None);
        }

        match cd::next_record(&mut self.reader)? {
            Some(entry) => {
                self.yielded += 1;
                Ok(Some(entry))
            }
            None => {
                self.exhausted = true;

                if self.yielded != self.end.directory_records() {
                    tracing::warn!(
                        declared = self.end.directory_records(),
                        found = self.yielded,
                        "central directory record count differs from the end of central directory record"
                    );
                }

                Ok(None)
            }
        }
    }

    /// Repositions the iterator at the first central directory record, discarding any buffered data.
    pub fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(self.end.directory_offset()))?;
        self.exhausted = false;
        self.yielded = 0;
        Ok(())
    }

    /// Returns an [`Iterator`] over the remaining entries.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries { inner: self, failed: false }
    }

    /// Drains this iterator from its first record into an [`AppendSession`] whose write cursor is the archive size.
    pub fn append_session(&mut self) -> Result<AppendSession> {
        let size = self.size;
        AppendSession::build(self, size)
    }
}

impl<R> DirectoryIterator<R> {
    /// Returns the archive's comment.
    pub fn comment(&self) -> &ZipString {
        self.end.comment()
    }

    /// Returns the located end of central directory values.
    pub fn end_of_central_directory(&self) -> &EndOfCentralDirectory {
        &self.end
    }

    /// Returns the archive size this iterator was constructed with.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// An [`Iterator`] adaptor over [`DirectoryIterator::next_entry()`], which stops after the first error.
pub struct Entries<'a, R> {
    inner: &'a mut DirectoryIterator<R>,
    failed: bool,
}

impl<R: ReadAt> Iterator for Entries<'_, R> {
    type Item = Result<ZipEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.inner.next_entry() {
            Ok(entry) => entry.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
