// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

/// The general purpose bit flag bits this crate interprets.
///
/// <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#444>
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GeneralPurposeFlag {
    pub encrypted: bool,
    pub data_descriptor: bool,
    pub filename_unicode: bool,
}

impl From<u16> for GeneralPurposeFlag {
    fn from(value: u16) -> GeneralPurposeFlag {
        let encrypted = !matches!(value & 0x1, 0);
        let data_descriptor = !matches!((value & 0x8) >> 3, 0);
        let filename_unicode = !matches!((value & 0x800) >> 11, 0);

        GeneralPurposeFlag { encrypted, data_descriptor, filename_unicode }
    }
}

impl From<GeneralPurposeFlag> for u16 {
    fn from(flag: GeneralPurposeFlag) -> u16 {
        let encrypted: u16 = match flag.encrypted {
            false => 0x0,
            true => 0b1,
        };
        let data_descriptor: u16 = match flag.data_descriptor {
            false => 0x0,
            true => 0x8,
        };
        let filename_unicode: u16 = match flag.filename_unicode {
            false => 0x0,
            true => 0x800,
        };

        encrypted | data_descriptor | filename_unicode
    }
}
