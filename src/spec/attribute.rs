// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

/// The host system an entry's external attributes were written for, taken from the upper byte of "version made by".
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCompatibility {
    Dos,
    Unix,
    Other(u8),
}

impl From<u16> for AttributeCompatibility {
    // https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4422
    fn from(version_made_by: u16) -> Self {
        match (version_made_by >> 8) as u8 {
            0 => AttributeCompatibility::Dos,
            3 => AttributeCompatibility::Unix,
            other => AttributeCompatibility::Other(other),
        }
    }
}

impl From<AttributeCompatibility> for u8 {
    fn from(compatibility: AttributeCompatibility) -> Self {
        match compatibility {
            AttributeCompatibility::Dos => 0,
            AttributeCompatibility::Unix => 3,
            AttributeCompatibility::Other(other) => other,
        }
    }
}
