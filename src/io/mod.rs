// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Byte sources and sinks used by the reading and writing modules.

pub(crate) mod offset;

use std::fs::File;
use std::io::{Error, ErrorKind, Read, Seek, SeekFrom};
use std::sync::Arc;

/// A source of bytes which supports reads at arbitrary positions.
///
/// Reads go through `&self`, so one source can back any number of independent readers at once; no cursor state is
/// held by the source itself.
pub trait ReadAt {
    /// Reads bytes starting at `offset` into `buf`, returning how many were read.
    ///
    /// Returning zero for a non-empty buffer signals that `offset` is at or past the end of the source.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Reads exactly `buf.len()` bytes starting at `offset`.
    fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> std::io::Result<()> {
        while !buf.is_empty() {
            match self.read_at(offset, buf) {
                Ok(0) => break,
                Ok(read) => {
                    let remaining = buf;
                    buf = &mut remaining[read..];
                    offset += read as u64;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        if !buf.is_empty() {
            return Err(Error::new(ErrorKind::UnexpectedEof, "failed to fill whole buffer"));
        }
        Ok(())
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.len());
        let read = buf.len().min(self.len() - start);

        buf[..read].copy_from_slice(&self[start..start + read]);
        Ok(read)
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }
}

impl<T: ReadAt + ?Sized> ReadAt for &T {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

impl<T: ReadAt + ?Sized> ReadAt for Box<T> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

impl<T: ReadAt + ?Sized> ReadAt for Arc<T> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read_at(offset, buf)
    }
}

#[cfg(any(unix, windows))]
impl ReadAt for File {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            std::os::unix::fs::FileExt::read_at(self, buf, offset)
        }

        // Moves the file cursor, but positioned reads never depend on it.
        #[cfg(windows)]
        {
            std::os::windows::fs::FileExt::seek_read(self, buf, offset)
        }
    }
}

/// A reader over the `[0, size)` range of a [`ReadAt`] source, owning its own cursor.
#[derive(Debug)]
pub struct SectionReader<R> {
    inner: R,
    size: u64,
    position: u64,
}

impl<R: ReadAt> SectionReader<R> {
    /// Constructs a new reader over the first `size` bytes of the source, positioned at its start.
    pub fn new(inner: R, size: u64) -> Self {
        Self { inner, size, position: 0 }
    }
}

impl<R: ReadAt> Read for SectionReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.position >= self.size {
            return Ok(0);
        }

        let remaining = self.size - self.position;
        let limit = usize::try_from(remaining).unwrap_or(usize::MAX).min(buf.len());
        let read = self.inner.read_at(self.position, &mut buf[..limit])?;

        self.position += read as u64;
        Ok(read)
    }
}

impl<R: ReadAt> Seek for SectionReader<R> {
    fn seek(&mut self, position: SeekFrom) -> std::io::Result<u64> {
        let (base, delta) = match position {
            SeekFrom::Start(offset) => {
                self.position = offset;
                return Ok(offset);
            }
            SeekFrom::End(delta) => (self.size, delta),
            SeekFrom::Current(delta) => (self.position, delta),
        };

        match base.checked_add_signed(delta) {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(Error::new(ErrorKind::InvalidInput, "invalid seek to a negative or overflowing position")),
        }
    }
}
