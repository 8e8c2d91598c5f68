// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

/// The sentinel stored in 32-bit size and offset fields whose real value lives in a ZIP64 record.
pub const NON_ZIP64_MAX_SIZE: u32 = u32::MAX;

/// The sentinel stored in 16-bit entry count fields whose real value lives in a ZIP64 record.
pub const NON_ZIP64_MAX_NUM_FILES: u16 = u16::MAX;

/// The sentinel stored in the 16-bit disk number field of a central directory record.
pub const NON_ZIP64_MAX_DISK: u16 = u16::MAX;
