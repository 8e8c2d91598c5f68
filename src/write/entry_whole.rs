// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::cdr::RawCentralDirectoryRecord;
use crate::core::edf::{self, Zip64ExtendedInformation};
use crate::core::lfh::{self, LocalFileHeader, RawLocalFileHeader};
use crate::entry::builder::ZipEntryBuilder;
use crate::entry::ZipEntry;
use crate::error::{Result, Zip64ErrorCase, ZipError};
use crate::spec::compression::Compression;
use crate::spec::consts::NON_ZIP64_MAX_SIZE;
use crate::spec::flag::GeneralPurposeFlag;
use crate::string::StringEncoding;
use crate::write::ZipFileWriter;

use std::borrow::Cow;
use std::io::Write;

/// The MS-DOS directory bit of the external file attribute.
const DOS_DIRECTORY_ATTRIBUTE: u32 = 0x10;

pub struct EntryWholeWriter<'b, 'c, W: Write> {
    writer: &'b mut ZipFileWriter<W>,
    builder: ZipEntryBuilder,
    data: &'c [u8],
}

impl<'b, 'c, W: Write> EntryWholeWriter<'b, 'c, W> {
    pub fn from_raw(writer: &'b mut ZipFileWriter<W>, builder: ZipEntryBuilder, data: &'c [u8]) -> Self {
        Self { writer, builder, data }
    }

    pub fn write(self) -> Result<()> {
        let compressed_data = compress(self.builder.compression, self.data)?;

        let uncompressed_size = self.data.len() as u64;
        let compressed_size = compressed_data.len() as u64;
        let header_offset = self.writer.writer.offset();

        let large_sizes = uncompressed_size >= NON_ZIP64_MAX_SIZE as u64 || compressed_size >= NON_ZIP64_MAX_SIZE as u64;
        let large_offset = header_offset >= NON_ZIP64_MAX_SIZE as u64;
        if large_sizes || large_offset {
            self.writer.require_zip64(Zip64ErrorCase::LargeFile)?;
        }

        let filename = self.builder.filename;
        let comment = self.builder.comment;
        let file_name_length = u16::try_from(filename.as_bytes().len()).map_err(|_| ZipError::FileNameTooLarge)?;
        let file_comment_length = u16::try_from(comment.as_bytes().len()).map_err(|_| ZipError::CommentTooLarge)?;
        let dir = filename.as_bytes().ends_with(b"/");

        let flags = GeneralPurposeFlag {
            encrypted: false,
            data_descriptor: false,
            filename_unicode: filename.encoding() == StringEncoding::Utf8
                && comment.encoding() == StringEncoding::Utf8
                && !(filename.as_bytes().is_ascii() && comment.as_bytes().is_ascii()),
        };
        let version_needed_to_extract =
            crate::spec::version::as_needed_to_extract(self.builder.compression, dir, large_sizes || large_offset);
        let crc_32 = crc32fast::hash(self.data);
        let date = self.builder.last_modification_date;

        // The local header's ZIP64 field, when present, must carry both sizes.
        let local_extra_field = match large_sizes {
            true => edf::as_bytes(&[Zip64ExtendedInformation {
                uncompressed_size: Some(uncompressed_size),
                compressed_size: Some(compressed_size),
                ..Default::default()
            }
            .to_field()])?,
            false => Vec::new(),
        };

        let (raw_compressed_size, raw_uncompressed_size) = match large_sizes {
            true => (NON_ZIP64_MAX_SIZE, NON_ZIP64_MAX_SIZE),
            false => (compressed_size as u32, uncompressed_size as u32),
        };

        let header = LocalFileHeader {
            raw: RawLocalFileHeader {
                version_needed_to_extract,
                general_purpose_flags: flags.into(),
                compression_method: self.builder.compression.into(),
                last_mod_file_time: date.time,
                last_mod_file_date: date.date,
                crc_32,
                compressed_size: raw_compressed_size,
                uncompressed_size: raw_uncompressed_size,
                file_name_length,
                extra_field_length: u16::try_from(local_extra_field.len())
                    .map_err(|_| ZipError::ExtraFieldTooLarge)?,
            },
            file_name: filename.as_bytes().to_vec(),
            extra_field: local_extra_field,
        };

        lfh::write(&mut self.writer.writer, &header)?;
        self.writer.writer.write_all(&compressed_data)?;

        let extra_fields = match large_sizes || large_offset {
            true => vec![Zip64ExtendedInformation {
                uncompressed_size: large_sizes.then_some(uncompressed_size),
                compressed_size: large_sizes.then_some(compressed_size),
                relative_header_offset: large_offset.then_some(header_offset),
                disk_start_number: None,
            }
            .to_field()],
            false => Vec::new(),
        };
        let extra_field = edf::as_bytes(&extra_fields)?;

        let external_file_attributes = self.builder.unix_permissions.map_or(0, |mode| u32::from(mode) << 16)
            | if dir { DOS_DIRECTORY_ATTRIBUTE } else { 0 };

        let raw = RawCentralDirectoryRecord {
            version_made_by: crate::spec::version::as_made_by(),
            version_needed_to_extract,
            general_purpose_bit_flag: header.raw.general_purpose_flags,
            compression_method: header.raw.compression_method,
            last_mod_file_time: date.time,
            last_mod_file_date: date.date,
            crc_32,
            compressed_size: raw_compressed_size,
            uncompressed_size: raw_uncompressed_size,
            file_name_length,
            extra_field_length: u16::try_from(extra_field.len()).map_err(|_| ZipError::ExtraFieldTooLarge)?,
            file_comment_length,
            disk_number_start: 0,
            internal_file_attributes: self.builder.internal_file_attribute,
            external_file_attributes,
            relative_offset_of_local_header: match large_offset {
                true => NON_ZIP64_MAX_SIZE,
                false => header_offset as u32,
            },
        };

        let entry = ZipEntry {
            raw,
            filename,
            extra_field,
            extra_fields,
            comment,
            uncompressed_size,
            compressed_size,
            header_offset,
            disk_start: 0,
        };

        tracing::trace!(filename = %entry.filename(), header_offset, compressed_size, "wrote entry");
        self.writer.session.push(entry);

        Ok(())
    }
}

fn compress(compression: Compression, data: &[u8]) -> Result<Cow<'_, [u8]>> {
    match compression {
        Compression::Stored => Ok(Cow::Borrowed(data)),
        #[cfg(feature = "deflate")]
        Compression::Deflate => {
            let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data)?;
            Ok(Cow::Owned(encoder.finish()?))
        }
        unsupported => Err(ZipError::CompressionNotSupported(unsupported.into())),
    }
}
