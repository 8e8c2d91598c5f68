// Copyright Cognite AS, 2023

use crate::append::AppendSession;
use crate::error::{Zip64ErrorCase, ZipError};
use crate::read::cd::next_record;
use crate::read::iter::DirectoryIterator;
use crate::spec::consts::NON_ZIP64_MAX_SIZE;
use crate::tests::init_logger;
use crate::tests::write::Sink;
use crate::write::ZipFileWriter;
use crate::{Compression, ZipEntryBuilder};

use std::io::Read;

/// Test writing a small zip64 file. No zip64 extra fields would be emitted, but z64 end of directory
/// records should be.
#[test]
fn test_write_zip64_file() {
    init_logger();

    let mut buffer = Vec::new();
    let mut writer = ZipFileWriter::new(&mut buffer).force_zip64();
    let entry = ZipEntryBuilder::new("file1".into(), Compression::Stored);
    writer.write_entry_whole(entry, &[0, 0, 0, 0]).unwrap();
    let entry = ZipEntryBuilder::new("file2".into(), Compression::Stored);
    writer.write_entry_whole(entry, &[0, 0, 0, 0]).unwrap();
    writer.close().unwrap();

    let mut iterator = DirectoryIterator::new(buffer.as_slice(), buffer.len() as i64).unwrap();
    assert!(iterator.end_of_central_directory().zip64());
    assert_eq!(iterator.end_of_central_directory().directory_records(), 2);
    while let Some(entry) = iterator.next_entry().unwrap() {
        assert!(!entry.zip64());
        assert!(entry.extra_fields().is_empty());
    }

    let cursor = std::io::Cursor::new(buffer);
    let mut zip = zip::read::ZipArchive::new(cursor).unwrap();
    let mut file1 = zip.by_name("file1").unwrap();
    let mut buffer = Vec::new();
    file1.read_to_end(&mut buffer).unwrap();
    assert_eq!(buffer.as_slice(), &[0, 0, 0, 0]);
    drop(file1);

    let mut file2 = zip.by_name("file2").unwrap();
    let mut buffer = Vec::new();
    file2.read_to_end(&mut buffer).unwrap();
    assert_eq!(buffer.as_slice(), &[0, 0, 0, 0]);
}

/// Test writing a zip64 file with more than u16::MAX files.
#[test]
fn test_write_zip64_file_many_entries() {
    init_logger();

    // The generated file will likely be ~6MB in size.
    let mut buffer = Vec::with_capacity(6_000_000);

    let mut writer = ZipFileWriter::new(&mut buffer);
    for i in 0..=u16::MAX as u32 {
        let entry = ZipEntryBuilder::new(i.to_string().into(), Compression::Stored);
        writer.write_entry_whole(entry, &[]).unwrap();
    }
    writer.close().unwrap();

    let mut iterator = DirectoryIterator::new(buffer.as_slice(), buffer.len() as i64).unwrap();
    assert!(iterator.end_of_central_directory().zip64());
    assert_eq!(iterator.entries().count(), u16::MAX as usize + 1);

    let cursor = std::io::Cursor::new(buffer);
    let mut zip = zip::read::ZipArchive::new(cursor).unwrap();
    assert_eq!(zip.len(), u16::MAX as usize + 1);
    zip.by_name(&u16::MAX.to_string()).unwrap();
}

/// Tests that when force_no_zip64 is true, closing errors when the directory holds too many files for a
/// non-Zip64 end of central directory record.
#[test]
fn test_force_no_zip64_errors_with_too_many_files_whole() {
    let mut writer = ZipFileWriter::new(Sink).force_no_zip64();
    for i in 0..u16::MAX {
        let entry = ZipEntryBuilder::new(format!("{i}").into(), Compression::Stored);
        writer.write_entry_whole(entry, &[]).unwrap()
    }
    let result = writer.close();

    assert!(matches!(result, Err(ZipError::Zip64Needed(Zip64ErrorCase::TooManyFiles))));
}

const LARGE_OFFSET: u64 = NON_ZIP64_MAX_SIZE as u64 + 10;

/// Tests appending beyond 4GiB, where the header offset is deferred to zip64 extended information.
#[test]
fn test_write_entry_at_large_offset() {
    init_logger();

    let mut writer = ZipFileWriter::append(AppendSession::empty(LARGE_OFFSET), Vec::new());
    let entry = ZipEntryBuilder::new("big".into(), Compression::Stored);
    writer.write_entry_whole(entry, b"data").unwrap();

    let stored = &writer.session().entries()[0];
    assert_eq!(stored.file_offset(), LARGE_OFFSET);
    assert!(stored.entry().zip64());

    let written = writer.close().unwrap();

    // The local file header needs no extra field, as the sizes are small.
    let mut directory = &written[30 + 3 + 4..];
    let entry = next_record(&mut directory).unwrap().unwrap();
    assert_eq!(entry.header_offset(), LARGE_OFFSET);
    assert_eq!(entry.uncompressed_size(), 4);
    assert!(entry.zip64());

    // The zip64 end records follow, so the directory has ended.
    assert!(next_record(&mut directory).unwrap().is_none());
    assert_eq!(&directory[..4], &0x06064b50u32.to_le_bytes());

    let eocdr = &written[written.len() - 22..];
    assert_eq!(&eocdr[16..20], &u32::MAX.to_le_bytes());
}

/// Tests that when force_no_zip64 is true, writing an entry beyond 4GiB errors.
#[test]
fn test_force_no_zip64_errors_with_large_offset() {
    let mut writer = ZipFileWriter::append(AppendSession::empty(LARGE_OFFSET), Sink).force_no_zip64();
    let entry = ZipEntryBuilder::new("big".into(), Compression::Stored);
    let result = writer.write_entry_whole(entry, b"data");

    assert!(matches!(result, Err(ZipError::Zip64Needed(Zip64ErrorCase::LargeFile))));
}
