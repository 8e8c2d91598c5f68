// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::read::iter::DirectoryIterator;
use crate::spec::compression::Compression;
use crate::tests::fixture::Fixture;
use crate::tests::init_logger;
use crate::tests::write::read_with_zip;
use crate::write::ZipFileWriter;
use crate::ZipEntryBuilder;

fn names(data: &[u8]) -> Vec<String> {
    let mut iterator = DirectoryIterator::new(data, data.len() as i64).expect("failed to open iterator");
    let mut names = Vec::new();
    while let Some(entry) = iterator.next_entry().expect("failed to read entry") {
        names.push(entry.filename().to_string());
    }
    names
}

fn append(original: &[u8], entries: &[(&str, &str)]) -> Vec<u8> {
    let session = DirectoryIterator::new(original, original.len() as i64)
        .and_then(|mut iterator| iterator.append_session())
        .expect("failed to build session");

    let mut buffer = original.to_vec();
    let mut writer = ZipFileWriter::append(session, &mut buffer);

    for (name, data) in entries {
        let opts = ZipEntryBuilder::new((*name).into(), Compression::Stored);
        writer.write_entry_whole(opts, data.as_bytes()).expect("failed to write entry");
    }

    writer.close().expect("failed to close writer");
    buffer
}

#[test]
fn append_new_entry() {
    init_logger();

    let original = Fixture::new().entry("a.txt", b"alpha").entry("b.txt", b"beta").build();
    let appended = append(&original, &[("c.txt", "gamma")]);

    assert_eq!(&appended[..original.len()], original.as_slice());
    assert_eq!(names(&appended), ["a.txt", "b.txt", "c.txt"]);

    assert_eq!(read_with_zip(&appended, "a.txt"), b"alpha");
    assert_eq!(read_with_zip(&appended, "b.txt"), b"beta");
    assert_eq!(read_with_zip(&appended, "c.txt"), b"gamma");
}

#[test]
fn append_replaces_by_name() {
    init_logger();

    let original = Fixture::new().entry("a.txt", b"old").entry("b.txt", b"beta").build();
    let appended = append(&original, &[("a.txt", "new"), ("c.txt", "gamma")]);

    assert_eq!(&appended[..original.len()], original.as_slice());
    assert_eq!(names(&appended), ["b.txt", "a.txt", "c.txt"]);
    assert_eq!(read_with_zip(&appended, "a.txt"), b"new");

    let mut iterator = DirectoryIterator::new(appended.as_slice(), appended.len() as i64).expect("failed to open");
    let session = iterator.append_session().expect("failed to build session");
    let a = session.get("a.txt").expect("no 'a.txt' entry");
    assert_eq!(a.file_offset(), original.len() as u64);
}

#[test]
fn append_keeps_existing_duplicates_shadowed() {
    let original = Fixture::new().entry("a.txt", b"first").entry("b.txt", b"b").entry("a.txt", b"second").build();
    let appended = append(&original, &[]);

    assert_eq!(names(&appended), ["b.txt", "a.txt"]);
    assert_eq!(read_with_zip(&appended, "a.txt"), b"second");
}

#[test]
fn append_carries_comment() {
    let original = Fixture::new().entry("a.txt", b"alpha").comment(b"original comment").build();
    let appended = append(&original, &[("b.txt", "beta")]);

    let iterator = DirectoryIterator::new(appended.as_slice(), appended.len() as i64).expect("failed to open");
    assert_eq!(iterator.comment(), "original comment");
}

#[test]
fn append_replaces_comment() {
    let original = Fixture::new().entry("a.txt", b"alpha").comment(b"original comment").build();
    let session = DirectoryIterator::new(original.as_slice(), original.len() as i64)
        .and_then(|mut iterator| iterator.append_session())
        .expect("failed to build session");

    let mut buffer = original.clone();
    let mut writer = ZipFileWriter::append(session, &mut buffer);
    writer.comment("replaced".into());
    writer.close().expect("failed to close writer");

    let iterator = DirectoryIterator::new(buffer.as_slice(), buffer.len() as i64).expect("failed to open");
    assert_eq!(iterator.comment(), "replaced");
}

#[test]
fn append_to_zip64_archive() {
    let original = Fixture::new().entry("a.txt", b"alpha").zip64_records().zip64_end().build();
    let appended = append(&original, &[("b.txt", "beta")]);

    assert_eq!(names(&appended), ["a.txt", "b.txt"]);
    assert_eq!(read_with_zip(&appended, "a.txt"), b"alpha");
    assert_eq!(read_with_zip(&appended, "b.txt"), b"beta");
}
