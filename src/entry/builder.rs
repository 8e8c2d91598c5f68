// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::date::ZipDateTime;
use crate::spec::compression::Compression;
use crate::string::ZipString;

/// A builder describing a new entry for [`ZipFileWriter`](crate::write::ZipFileWriter).
///
/// Sizes, the CRC32 and the header offset are computed by the writer, so only descriptive properties are set here.
#[derive(Clone, Debug)]
pub struct ZipEntryBuilder {
    pub(crate) filename: ZipString,
    pub(crate) compression: Compression,
    pub(crate) last_modification_date: ZipDateTime,
    pub(crate) unix_permissions: Option<u16>,
    pub(crate) internal_file_attribute: u16,
    pub(crate) comment: ZipString,
}

impl ZipEntryBuilder {
    /// Constructs a new builder which defines the raw underlying data of a ZIP entry.
    ///
    /// A filename and compression method are needed to construct the builder as minimal parameters.
    pub fn new(filename: ZipString, compression: Compression) -> Self {
        Self {
            filename,
            compression,
            last_modification_date: ZipDateTime::default(),
            unix_permissions: None,
            internal_file_attribute: 0,
            comment: ZipString::default(),
        }
    }

    /// Sets the entry's last modification date.
    pub fn last_modification_date(mut self, date: ZipDateTime) -> Self {
        self.last_modification_date = date;
        self
    }

    /// Sets the entry's UNIX permissions, stored in the upper half of the external file attribute.
    pub fn unix_permissions(mut self, mode: u16) -> Self {
        self.unix_permissions = Some(mode);
        self
    }

    /// Sets the entry's internal file attribute.
    pub fn internal_file_attribute(mut self, attribute: u16) -> Self {
        self.internal_file_attribute = attribute;
        self
    }

    /// Sets the entry's file comment.
    pub fn comment(mut self, comment: ZipString) -> Self {
        self.comment = comment;
        self
    }
}
