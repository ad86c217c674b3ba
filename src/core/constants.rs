// Format constants for result files

/// Preamble magic shared by writer and reader.
pub const MAGIC: u32 = 0xCE98_3826;

/// Version every writer produces. Readers accept `1..=CURRENT_VERSION`.
pub const CURRENT_VERSION: u32 = 4;

// First version carrying trigger delta, signal quality and nio percentage
pub const VERSION_SIGNAL_QUALITY: u32 = 2;
// Reference curves as y-only floats
pub const VERSION_LEGACY_REFERENCE: u32 = 3;
// Reference curves as explicit (x, y) doubles
pub const VERSION_POINT_REFERENCE: u32 = 4;

// Header: magic(u32) version(u32)
pub const HEADER_SIZE: usize = 4 + 4;

// Compressed blob prefix: uncompressed length (u32, big-endian)
pub const BLOB_PREFIX_SIZE: usize = 4;

/// Rank assigned to every decoded sample; ranks are not persisted.
pub const MAX_RANK: u8 = 255;

/// Wire discriminator of the double array payload kind.
pub const KIND_DOUBLE_ARRAY: i32 = 5;

pub const RESULT_EXTENSION: &str = "result";
pub const METADATA_FILE: &str = "metadata.json";
pub const SEAM_SERIES_PREFIX: &str = "seam_series";
pub const SEAM_PREFIX: &str = "seam";
