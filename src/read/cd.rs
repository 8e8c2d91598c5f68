// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Decoding of individual central directory records into [`ZipEntry`]s.

use crate::core::cdr::{self, CentralDirectoryRecord};
use crate::core::edf::{self, Zip64ExtendedInformation, Zip64Sentinels, ZIP64_HEADER_ID};
use crate::core::SIGNATURE_LENGTH;
use crate::entry::ZipEntry;
use crate::error::{Result, ZipError};
use crate::spec::consts::{NON_ZIP64_MAX_DISK, NON_ZIP64_MAX_SIZE};
use crate::spec::flag::GeneralPurposeFlag;
use crate::string::{StringEncoding, ZipString};
use crate::utils::read_up_to;

use std::io::BufRead;

/// Reads the central directory record at the reader's position.
///
/// `Ok(None)` is returned when the reader is exhausted before a full signature could be read, or when the next four
/// bytes aren't a central directory record signature (eg. the ZIP64 end of central directory record which follows
/// the directory). In the latter case the reader is left at those bytes as long as they were already buffered. Once a
/// signature has matched, the record must be complete and consistent or an error is returned.
pub fn next_record<R: BufRead>(reader: &mut R) -> Result<Option<ZipEntry>> {
    let mut signature = [0; SIGNATURE_LENGTH];
    let buffered = reader.fill_buf()?;
    let peeked = buffered.len() >= SIGNATURE_LENGTH;

    if peeked {
        signature.copy_from_slice(&buffered[..SIGNATURE_LENGTH]);
    } else {
        // The signature straddles the end of the buffered data, so it can only be read, not peeked at.
        let filled = read_up_to(reader, &mut signature)?;

        if filled < SIGNATURE_LENGTH {
            tracing::trace!(filled, "input exhausted before a central directory record signature");
            return Ok(None);
        }
    }

    let signature = u32::from_le_bytes(signature);
    if signature != cdr::SIGNATURE {
        tracing::trace!(signature, "no further central directory records");
        return Ok(None);
    }

    if peeked {
        reader.consume(SIGNATURE_LENGTH);
    }

    let record = cdr::read_after_signature(reader)?;
    let entry = entry_from_record(record)?;

    tracing::trace!(
        filename = %entry.filename(),
        compressed_size = entry.compressed_size(),
        header_offset = entry.header_offset(),
        "parsed central directory record"
    );

    Ok(Some(entry))
}

/// Resolves a raw central directory record into an entry, substituting any ZIP64 extended information.
pub(crate) fn entry_from_record(record: CentralDirectoryRecord) -> Result<ZipEntry> {
    let CentralDirectoryRecord { raw, file_name, extra_field, file_comment } = record;
    let extra_fields = edf::read_all(&extra_field)?;

    let sentinels = Zip64Sentinels {
        uncompressed_size: raw.uncompressed_size == NON_ZIP64_MAX_SIZE,
        compressed_size: raw.compressed_size == NON_ZIP64_MAX_SIZE,
        relative_header_offset: raw.relative_offset_of_local_header == NON_ZIP64_MAX_SIZE,
        disk_start_number: raw.disk_number_start == NON_ZIP64_MAX_DISK,
    };

    let zip64 = match extra_fields.iter().find(|field| field.header_id == ZIP64_HEADER_ID) {
        Some(field) => Zip64ExtendedInformation::from_data(&field.data, sentinels)?,
        // An uncompressed size of exactly u32::MAX is a legitimate (if unlikely) non-ZIP64 value.
        None if sentinels.compressed_size || sentinels.relative_header_offset => {
            return Err(ZipError::MalformedRecord("sentinel value without zip64 extended information"));
        }
        None => Zip64ExtendedInformation::default(),
    };

    let flags = GeneralPurposeFlag::from(raw.general_purpose_bit_flag);
    let filename_encoding = detect_encoding(flags, &file_name);
    let filename = ZipString::new(file_name, filename_encoding);
    let comment_encoding = detect_encoding(flags, &file_comment);
    let comment = ZipString::new(file_comment, comment_encoding);

    Ok(ZipEntry {
        uncompressed_size: zip64.uncompressed_size.unwrap_or(raw.uncompressed_size.into()),
        compressed_size: zip64.compressed_size.unwrap_or(raw.compressed_size.into()),
        header_offset: zip64.relative_header_offset.unwrap_or(raw.relative_offset_of_local_header.into()),
        disk_start: zip64.disk_start_number.unwrap_or(raw.disk_number_start.into()),
        raw,
        filename,
        extra_field,
        extra_fields,
        comment,
    })
}

/// Without the language encoding flag, only pure ASCII can safely be assumed to be UTF-8.
fn detect_encoding(flags: GeneralPurposeFlag, raw: &[u8]) -> StringEncoding {
    if flags.filename_unicode || raw.is_ascii() {
        StringEncoding::Utf8
    } else {
        StringEncoding::Raw
    }
}
