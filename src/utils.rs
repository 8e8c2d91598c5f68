// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::{Result, ZipError};

use std::io::{ErrorKind, Read, Write};

pub(crate) fn read_u16<R: Read>(reader: &mut R) -> Result<u16> {
    let mut buffer = [0; 2];
    reader.read_exact(&mut buffer)?;
    Ok(u16::from_le_bytes(buffer))
}

pub(crate) fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buffer = [0; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

pub(crate) fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buffer = [0; 8];
    reader.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

pub(crate) fn write_u16<W: Write>(writer: &mut W, value: u16) -> Result<()> {
    Ok(writer.write_all(&value.to_le_bytes())?)
}

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    Ok(writer.write_all(&value.to_le_bytes())?)
}

pub(crate) fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    Ok(writer.write_all(&value.to_le_bytes())?)
}

/// Read and return a dynamic length vector of bytes from a reader which impls Read.
///
/// Fewer than `length` bytes being available is reported as [`ZipError::UnexpectedEndOfInput`].
pub(crate) fn read_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0; length];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Fill as much of the buffer as the reader can provide, returning the number of bytes read.
///
/// Unlike [`Read::read_exact()`], running out of data is not an error here.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<usize> {
    let mut filled = 0;

    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(filled)
}

/// Assert that the next four-byte signature read by a reader which impls Read matches the expected signature.
pub(crate) fn assert_signature<R: Read>(reader: &mut R, expected: u32) -> Result<()> {
    match read_u32(reader)? {
        actual if actual == expected => Ok(()),
        actual => Err(ZipError::UnexpectedSignature { actual, expected }),
    }
}
