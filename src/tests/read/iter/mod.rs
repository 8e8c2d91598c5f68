// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::ZipError;
use crate::read::iter::DirectoryIterator;
use crate::tests::fixture::Fixture;
use crate::tests::{init_logger, CountingSource};

use std::sync::Arc;

fn names<R: crate::io::ReadAt>(iterator: &mut DirectoryIterator<R>) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(entry) = iterator.next_entry().expect("failed to read entry") {
        names.push(entry.filename().to_string());
    }
    names
}

fn fixture() -> Fixture {
    Fixture::new().entry("alpha.txt", b"alpha").entry("beta/", b"").entry("gamma.txt", b"gamma").comment(b"archive")
}

#[test]
fn iterates_in_physical_order_test() {
    init_logger();

    let (data, layout) = fixture().build_with_layout();
    let size = data.len() as i64;
    let mut iterator = DirectoryIterator::new(data, size).expect("failed to open iterator");

    let first = iterator.next_entry().expect("failed to read entry").expect("no entry");
    assert_eq!(first.filename(), "alpha.txt");
    assert_eq!(first.header_offset(), layout.header_offsets[0]);

    let second = iterator.next_entry().expect("failed to read entry").expect("no entry");
    assert_eq!(second.filename(), "beta/");
    assert!(second.dir());
    assert_eq!(second.header_offset(), layout.header_offsets[1]);

    let third = iterator.next_entry().expect("failed to read entry").expect("no entry");
    assert_eq!(third.filename(), "gamma.txt");
    assert_eq!(third.header_offset(), layout.header_offsets[2]);

    for _ in 0..3 {
        assert!(iterator.next_entry().expect("failed at end").is_none());
    }
}

#[test]
fn reset_test() {
    let data = fixture().build();
    let size = data.len() as i64;

    let mut fresh = DirectoryIterator::new(data.clone(), size).expect("failed to open iterator");
    let expected = names(&mut fresh);
    assert_eq!(expected, ["alpha.txt", "beta/", "gamma.txt"]);

    let mut iterator = DirectoryIterator::new(data, size).expect("failed to open iterator");
    iterator.next_entry().expect("failed to read entry").expect("no entry");
    iterator.reset().expect("failed to reset");
    assert_eq!(names(&mut iterator), expected);

    assert!(iterator.next_entry().expect("failed at end").is_none());
    iterator.reset().expect("failed to reset");
    assert_eq!(names(&mut iterator), expected);
    assert_eq!(iterator.comment(), fresh.comment());
    assert_eq!(iterator.comment(), "archive");
}

#[test]
fn entries_adaptor_test() {
    let data = fixture().build();
    let size = data.len() as i64;
    let mut iterator = DirectoryIterator::new(data, size).expect("failed to open iterator");

    let entries = iterator.entries().collect::<Result<Vec<_>, _>>().expect("failed to iterate");
    assert_eq!(entries.len(), 3);
    assert_eq!(iterator.entries().count(), 0);
}

#[test]
fn empty_archive_test() {
    let data = Fixture::new().build();
    let mut iterator = DirectoryIterator::new(data, 22).expect("failed to open iterator");

    assert!(iterator.next_entry().expect("failed at end").is_none());
    assert!(iterator.comment().is_empty());
}

#[test]
fn negative_size_test() {
    let source = CountingSource::new(fixture().build());

    let result = DirectoryIterator::new(&source, -1);
    assert!(matches!(result, Err(ZipError::InvalidArgument(_))));
    assert_eq!(source.reads.get(), 0);
}

#[test]
fn not_a_zip_test() {
    let result = DirectoryIterator::new(vec![0u8; 4096], 4096);
    assert!(matches!(result, Err(ZipError::NotAZipArchive)));
}

#[test]
fn truncated_record_test() {
    init_logger();

    let (mut data, layout) = fixture().build_with_layout();
    let size = data.len() as i64;

    // The second record's file name length, so its name runs past the end of the archive.
    let second = layout.cd_offset as usize + 46 + "alpha.txt".len();
    data[second + 28..second + 30].copy_from_slice(&u16::MAX.to_le_bytes());

    let mut iterator = DirectoryIterator::new(data, size).expect("failed to open iterator");
    iterator.next_entry().expect("failed to read entry").expect("no entry");

    let err = iterator.next_entry().expect_err("truncated record parsed");
    assert!(matches!(err, ZipError::UnexpectedEndOfInput));
}

#[test]
fn declared_count_mismatch_test() {
    init_logger();

    let (mut data, layout) = fixture().build_with_layout();
    let eocdr = layout.eocdr_offset as usize;
    data[eocdr + 8..eocdr + 10].copy_from_slice(&5u16.to_le_bytes());
    data[eocdr + 10..eocdr + 12].copy_from_slice(&5u16.to_le_bytes());

    let size = data.len() as i64;
    let mut iterator = DirectoryIterator::new(data, size).expect("failed to open iterator");

    assert_eq!(iterator.end_of_central_directory().directory_records(), 5);
    assert_eq!(names(&mut iterator).len(), 3);
}

#[test]
fn trailing_data_ignored_test() {
    let data = fixture().build();
    let size = data.len() as i64;

    let mut padded = data.clone();
    padded.extend_from_slice(&[0xAA; 64]);

    // Only the first `size` bytes are considered.
    let mut iterator = DirectoryIterator::new(padded, size).expect("failed to open iterator");
    assert_eq!(names(&mut iterator).len(), 3);
}

#[test]
fn shared_source_test() {
    let data = Arc::new(fixture().build());
    let size = data.len() as i64;

    let mut first = DirectoryIterator::new(Arc::clone(&data), size).expect("failed to open iterator");
    let mut second = DirectoryIterator::new(Arc::clone(&data), size).expect("failed to open iterator");

    let a = first.next_entry().expect("failed to read entry").expect("no entry");
    let b = second.next_entry().expect("failed to read entry").expect("no entry");
    let c = second.next_entry().expect("failed to read entry").expect("no entry");
    let d = first.next_entry().expect("failed to read entry").expect("no entry");

    assert_eq!(a.filename(), b.filename());
    assert_eq!(c.filename(), d.filename());
    assert_eq!(d.filename(), "beta/");
}

#[test]
fn file_source_test() {
    use std::io::Write;

    let data = fixture().build();
    let path = std::env::temp_dir().join(format!("zip_append_iter_{}.zip", std::process::id()));

    let mut file = std::fs::File::create(&path).expect("failed to create file");
    file.write_all(&data).expect("failed to write file");
    drop(file);

    let file = std::fs::File::open(&path).expect("failed to open file");
    let size = file.metadata().expect("failed to read metadata").len() as i64;
    let mut iterator = DirectoryIterator::new(file, size).expect("failed to open iterator");
    let names = names(&mut iterator);

    let _ = std::fs::remove_file(&path);
    assert_eq!(names, ["alpha.txt", "beta/", "gamma.txt"]);
}
