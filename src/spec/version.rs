// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::spec::attribute::AttributeCompatibility;
use crate::spec::compression::Compression;

/// The version of the specification this crate writes against (6.3).
const SPECIFICATION_VERSION: u16 = 63;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#443
pub fn as_needed_to_extract(compression: Compression, dir: bool, zip64: bool) -> u16 {
    let mut version = match compression {
        Compression::Deflate => 20,
        Compression::Deflate64 => 21,
        Compression::Bz => 46,
        Compression::Lzma => 63,
        _ => 10,
    };

    if dir {
        version = std::cmp::max(version, 20);
    }
    if zip64 {
        version = std::cmp::max(version, 45);
    }

    version
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#442
pub fn as_made_by() -> u16 {
    (u16::from(u8::from(AttributeCompatibility::Unix)) << 8) | SPECIFICATION_VERSION
}
