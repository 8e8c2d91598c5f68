// Copyright (c) 2021-2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports writing ZIP files, either from scratch or by appending to an existing archive.
//!
//! # Example
//! ### Appending to an existing archive
//! ```no_run
//! # use zip_append::{Compression, ZipEntryBuilder, read::DirectoryIterator, write::ZipFileWriter};
//! # use zip_append::error::Result;
//! # use std::fs::OpenOptions;
//! # use std::io::{Seek, SeekFrom};
//! #
//! # fn run() -> Result<()> {
//! let mut file = OpenOptions::new().read(true).write(true).open("./foo.zip")?;
//! let size = file.metadata()?.len();
//!
//! let session = DirectoryIterator::new(&file, size as i64)?.append_session()?;
//! file.seek(SeekFrom::Start(session.write_cursor()))?;
//!
//! let mut writer = ZipFileWriter::append(session, file);
//! let opts = ZipEntryBuilder::new(String::from("bar.txt").into(), Compression::Stored);
//! writer.write_entry_whole(opts, b"This is an example file.")?;
//! writer.close()?;
//! #   Ok(())
//! # }
//! ```

pub(crate) mod entry_whole;

use crate::append::AppendSession;
use crate::core::cdr;
use crate::core::eocdr::{self, EndOfCentralDirectoryRecord, RawEndOfCentralDirectoryRecord};
use crate::core::zip64::eocdr::{self as zip64_eocdr, RawZip64EndOfCentralDirectoryRecord};
use crate::core::zip64::locator::{self as zip64_locator, RawZip64EndOfCentralDirectoryLocator};
use crate::entry::builder::ZipEntryBuilder;
use crate::error::{Result, Zip64ErrorCase, ZipError};
use crate::io::offset::OffsetWriter;
use crate::spec::consts::{NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE};
use crate::string::ZipString;

use entry_whole::EntryWholeWriter;

use std::io::Write;

/// A ZIP file writer which acts over [`Write`] implementers.
///
/// # Note
/// - [`ZipFileWriter::close()`] must be called before the writer goes out of scope.
/// - Entries from the [`AppendSession`] are carried over into the new central directory, except those shadowed by a
///   later entry of the same name. Their bytes are left where they are.
pub struct ZipFileWriter<W> {
    pub(crate) writer: OffsetWriter<W>,
    pub(crate) session: AppendSession,
    /// If true, will error if a Zip64 struct must be written.
    pub(crate) force_no_zip64: bool,
    /// Whether to write Zip64 end of directory structs.
    pub(crate) is_zip64: bool,
    comment_opt: Option<ZipString>,
}

impl<W: Write> ZipFileWriter<W> {
    /// Construct a new ZIP file writer for a new archive.
    pub fn new(writer: W) -> Self {
        Self::append(AppendSession::empty(0), writer)
    }

    /// Construct a ZIP file writer which appends to the archive `session` was built from.
    ///
    /// The writer must already be positioned at [`AppendSession::write_cursor()`].
    pub fn append(session: AppendSession, writer: W) -> Self {
        Self {
            writer: OffsetWriter::new(writer, session.write_cursor()),
            session,
            force_no_zip64: false,
            is_zip64: false,
            comment_opt: None,
        }
    }

    /// Force the ZIP writer to operate in non-ZIP64 mode.
    /// If any files would need ZIP64, an error will be raised.
    pub fn force_no_zip64(mut self) -> Self {
        self.force_no_zip64 = true;
        self
    }

    /// Force the ZIP writer to emit Zip64 structs at the end of the archive.
    /// Zip64 extended fields will only be written if needed.
    pub fn force_zip64(mut self) -> Self {
        self.is_zip64 = true;
        self
    }

    /// Write a new ZIP entry of known size and data.
    ///
    /// An existing entry of the same name is shadowed rather than replaced on disk.
    pub fn write_entry_whole(&mut self, builder: ZipEntryBuilder, data: &[u8]) -> Result<()> {
        EntryWholeWriter::from_raw(self, builder, data).write()
    }

    /// Set the ZIP file comment, replacing the one carried over from an appended archive.
    pub fn comment(&mut self, comment: ZipString) {
        self.comment_opt = Some(comment);
    }

    /// Returns the entries written or carried over so far.
    pub fn session(&self) -> &AppendSession {
        &self.session
    }

    /// Returns a mutable reference to the inner writer.
    ///
    /// Care should be taken when using this inner writer as doing so may invalidate internal state of this writer.
    pub fn inner_mut(&mut self) -> &mut W {
        self.writer.inner_mut()
    }

    /// Consumes this ZIP writer and completes all closing tasks.
    ///
    /// This includes:
    /// - Writing a central directory record for every live entry.
    /// - Writing the ZIP64 end of central directory record and locator, if needed.
    /// - Writing the end of central directory record and the file comment.
    ///
    /// Failure to call this function before going out of scope would result in a corrupted ZIP file.
    pub fn close(mut self) -> Result<W> {
        let cd_offset = self.writer.offset();
        let mut num_entries_in_directory: u64 = 0;

        for stored in self.session.live_entries() {
            cdr::write(&mut self.writer, &stored.entry.to_record())?;
            num_entries_in_directory += 1;
        }

        let central_directory_size = self.writer.offset() - cd_offset;

        if num_entries_in_directory >= NON_ZIP64_MAX_NUM_FILES as u64 {
            self.require_zip64(Zip64ErrorCase::TooManyFiles)?;
        }
        if central_directory_size >= NON_ZIP64_MAX_SIZE as u64 || cd_offset >= NON_ZIP64_MAX_SIZE as u64 {
            self.require_zip64(Zip64ErrorCase::LargeFile)?;
        }

        let comment = self.comment_opt.take().unwrap_or_else(|| self.session.comment.clone());
        let zip_file_comment_length = u16::try_from(comment.as_bytes().len()).map_err(|_| ZipError::CommentTooLarge)?;

        // All end of central directory values defer to the ZIP64 record once it's written.
        let raw = if self.is_zip64 {
            let eocdr_offset = self.writer.offset();

            let record = RawZip64EndOfCentralDirectoryRecord {
                size_of_record: zip64_eocdr::SIZE_OF_FIXED_RECORD,
                version_made_by: crate::spec::version::as_made_by(),
                version_needed: 45,
                number_of_this_disk: 0,
                disk_with_start_of_cd: 0,
                total_entries_in_cd_on_this_disk: num_entries_in_directory,
                total_entries_in_cd: num_entries_in_directory,
                size_of_cd: central_directory_size,
                offset_start_of_cd: cd_offset,
            };
            zip64_eocdr::write(&mut self.writer, &record)?;

            let locator = RawZip64EndOfCentralDirectoryLocator {
                disk_with_start_eocdr: 0,
                relative_offset_eocdr: eocdr_offset,
                total_disks: 1,
            };
            zip64_locator::write(&mut self.writer, &locator)?;

            RawEndOfCentralDirectoryRecord {
                number_of_this_disk: 0,
                disk_with_start_of_cd: 0,
                total_entries_in_cd_on_this_disk: NON_ZIP64_MAX_NUM_FILES,
                total_entries_in_cd: NON_ZIP64_MAX_NUM_FILES,
                size_of_cd: NON_ZIP64_MAX_SIZE,
                offset_start_of_cd: NON_ZIP64_MAX_SIZE,
                zip_file_comment_length,
            }
        } else {
            RawEndOfCentralDirectoryRecord {
                number_of_this_disk: 0,
                disk_with_start_of_cd: 0,
                total_entries_in_cd_on_this_disk: num_entries_in_directory as u16,
                total_entries_in_cd: num_entries_in_directory as u16,
                size_of_cd: central_directory_size as u32,
                offset_start_of_cd: cd_offset as u32,
                zip_file_comment_length,
            }
        };

        eocdr::write(&mut self.writer, &EndOfCentralDirectoryRecord { raw, zip_file_comment: comment.into_bytes() })?;
        self.writer.flush()?;

        tracing::debug!(entries = num_entries_in_directory, cd_offset, zip64 = self.is_zip64, "closed archive");
        Ok(self.writer.into_inner())
    }

    pub(crate) fn require_zip64(&mut self, case: Zip64ErrorCase) -> Result<()> {
        if self.force_no_zip64 {
            return Err(ZipError::Zip64Needed(case));
        }

        self.is_zip64 = true;
        Ok(())
    }
}
