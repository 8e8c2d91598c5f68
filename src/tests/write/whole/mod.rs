// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::lfh;
use crate::error::ZipError;
use crate::read::iter::DirectoryIterator;
use crate::spec::compression::Compression;
use crate::tests::write::read_with_zip;
use crate::write::ZipFileWriter;
use crate::{ZipDateTime, ZipEntryBuilder};

const DATA: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt...";

#[test]
fn empty() {
    let writer = ZipFileWriter::new(Vec::new());
    let data = writer.close().expect("failed to close writer");
    assert_eq!(data.len(), 22);

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    assert!(iterator.next_entry().expect("failed at end").is_none());

    let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).expect("zip crate failed to open archive");
    assert_eq!(archive.len(), 0);
}

#[test]
fn single_entry_no_data() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let opts = ZipEntryBuilder::new("foo.bar".into(), Compression::Stored);

    writer.write_entry_whole(opts, &[]).expect("failed to write entry");
    let data = writer.close().expect("failed to close writer");

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let entry = iterator.next_entry().expect("failed to read entry").expect("no entry");

    assert_eq!(entry.filename(), "foo.bar");
    assert_eq!(entry.header_offset(), 0);
    assert_eq!(entry.compressed_size(), 0);
    assert_eq!(entry.uncompressed_size(), 0);
    assert_eq!(entry.compression().expect("unknown compression"), Compression::Stored);
    assert!(iterator.next_entry().expect("failed at end").is_none());
}

#[test]
fn single_entry_stored() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let date = ZipDateTime::from_parts(2022, 10, 23, 16, 55, 2);
    let opts = ZipEntryBuilder::new("foo.bar".into(), Compression::Stored)
        .last_modification_date(date)
        .unix_permissions(0o100644)
        .comment("entry comment".into());

    writer.write_entry_whole(opts, DATA.as_bytes()).expect("failed to write entry");
    let data = writer.close().expect("failed to close writer");

    assert_eq!(read_with_zip(&data, "foo.bar"), DATA.as_bytes());

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let entry = iterator.next_entry().expect("failed to read entry").expect("no entry");

    assert_eq!(entry.uncompressed_size(), DATA.len() as u64);
    assert_eq!(entry.compressed_size(), DATA.len() as u64);
    assert_eq!(entry.crc32(), crc32fast::hash(DATA.as_bytes()));
    assert_eq!(entry.last_modification_date(), date);
    assert_eq!(entry.unix_permissions(), Some(0o100644));
    assert_eq!(entry.comment(), "entry comment");
    assert!(!entry.zip64());
}

#[cfg(feature = "deflate")]
#[test]
fn single_entry_deflate() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let opts = ZipEntryBuilder::new("foo.bar".into(), Compression::Deflate);

    writer.write_entry_whole(opts, DATA.as_bytes()).expect("failed to write entry");
    let data = writer.close().expect("failed to close writer");

    assert_eq!(read_with_zip(&data, "foo.bar"), DATA.as_bytes());

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let entry = iterator.next_entry().expect("failed to read entry").expect("no entry");
    assert_eq!(entry.compression().expect("unknown compression"), Compression::Deflate);
    assert_eq!(entry.uncompressed_size(), DATA.len() as u64);
}

#[test]
fn local_headers_match_directory() {
    let mut writer = ZipFileWriter::new(Vec::new());
    writer.write_entry_whole(ZipEntryBuilder::new("first".into(), Compression::Stored), b"one").expect("write failed");
    writer.write_entry_whole(ZipEntryBuilder::new("second".into(), Compression::Stored), DATA.as_bytes()).expect("write failed");
    let data = writer.close().expect("failed to close writer");

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let mut payloads = vec![&b"one"[..], DATA.as_bytes()].into_iter();

    while let Some(entry) = iterator.next_entry().expect("failed to read entry") {
        let mut reader = &data[entry.header_offset() as usize..];
        let header = lfh::read(&mut reader).expect("failed to read local header");

        assert_eq!(header.file_name, entry.filename().as_bytes());
        assert_eq!(header.raw.crc_32, entry.crc32());
        assert_eq!(header.raw.compressed_size as u64, entry.compressed_size());
        assert!(header.extra_field.is_empty());
        assert_eq!(&reader[..entry.compressed_size() as usize], payloads.next().expect("too many entries"));
    }
}

#[test]
fn directory_entry() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let opts = ZipEntryBuilder::new("foo/".into(), Compression::Stored);

    writer.write_entry_whole(opts, &[]).expect("failed to write entry");
    let data = writer.close().expect("failed to close writer");

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let entry = iterator.next_entry().expect("failed to read entry").expect("no entry");

    assert!(entry.dir());
    assert_eq!(entry.external_file_attribute() & 0x10, 0x10);
    assert_eq!(entry.version_needed_to_extract(), 20);
}

#[test]
fn comment() {
    let mut writer = ZipFileWriter::new(Vec::new());
    writer.comment("archive comment".into());
    let data = writer.close().expect("failed to close writer");

    let iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    assert_eq!(iterator.comment(), "archive comment");

    let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).expect("zip crate failed to open archive");
    assert_eq!(archive.comment(), b"archive comment");
}

#[test]
fn unsupported_compression() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let opts = ZipEntryBuilder::new("foo.bar".into(), Compression::Bz);

    let result = writer.write_entry_whole(opts, DATA.as_bytes());
    assert!(matches!(result, Err(ZipError::CompressionNotSupported(12))));
}

#[test]
fn filename_too_large() {
    let mut writer = ZipFileWriter::new(Vec::new());
    let opts = ZipEntryBuilder::new("f".repeat(u16::MAX as usize + 1).into(), Compression::Stored);

    let result = writer.write_entry_whole(opts, &[]);
    assert!(matches!(result, Err(ZipError::FileNameTooLarge)));
}

#[test]
fn duplicate_names_shadowed() {
    let mut writer = ZipFileWriter::new(Vec::new());

    writer.write_entry_whole(ZipEntryBuilder::new("a.txt".into(), Compression::Stored), b"old").expect("write failed");
    writer.write_entry_whole(ZipEntryBuilder::new("a.txt".into(), Compression::Stored), b"new").expect("write failed");
    assert_eq!(writer.session().len(), 2);
    assert_eq!(writer.session().index_of("a.txt"), Some(1));

    let data = writer.close().expect("failed to close writer");

    let mut iterator = DirectoryIterator::new(data.as_slice(), data.len() as i64).expect("failed to open iterator");
    let entry = iterator.next_entry().expect("failed to read entry").expect("no entry");
    assert!(iterator.next_entry().expect("failed at end").is_none());

    assert_eq!(entry.header_offset(), 30 + 5 + 3);
    assert_eq!(read_with_zip(&data, "a.txt"), b"new");
}
