// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Byte-level definitions of the ZIP records this crate reads and writes.
//!
//! Each record lives in its own module and exposes a `raw_read`/`raw_write` pair for the fixed-size portion of the
//! record (excluding its signature), generated by the [`raw!`] macro.

pub mod cdr;
pub mod edf;
pub mod eocdr;
pub mod lfh;
pub mod zip64;

/// The length in bytes of a signature. All signatures are u32s, so 4 bytes long.
pub const SIGNATURE_LENGTH: usize = 4;

macro_rules! raw {
    ($name:ident { $($field:ident, $type:ty, $read:expr, $write:expr),* }) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $field : $type),*
        }

        /// Reads the raw underlying record from the given reader.
        pub fn raw_read<R: std::io::Read>(reader: &mut R) -> crate::error::Result<$name> {
            Ok($name {
                $($field : $read(&mut *reader)? ),*
            })
        }

        /// Writes the raw underlying record to the given writer.
        pub fn raw_write<W: std::io::Write>(writer: &mut W, raw: &$name) -> crate::error::Result<()> {
            $($write(&mut *writer, raw.$field)?;)*
            Ok(())
        }
    }
}

macro_rules! raw_deref {
    ($from:ident, $to:ident) => {
        impl std::ops::Deref for $from {
            type Target = $to;

            fn deref(&self) -> &Self::Target {
                &self.raw
            }
        }
    };
}

pub(crate) use raw;
pub(crate) use raw_deref;
