// Magic + version preamble

use crate::core::constants::{CURRENT_VERSION, MAGIC};
use crate::core::error::{ResultsError, Result};
use crate::core::wire::{WireReader, WireWriter};
use std::io::{Read, Write};

pub fn write_header<W: Write>(writer: &mut WireWriter<W>) -> Result<()> {
    writer.write_u32(MAGIC)?;
    writer.write_u32(CURRENT_VERSION)
}

/// Reads the preamble and records the parsed version on `reader`.
pub fn verify_header<R: Read>(reader: &mut WireReader<R>) -> Result<u32> {
    let magic = reader.read_u32()?;
    if magic != MAGIC {
        return Err(ResultsError::InvalidMagic {
            expected: MAGIC,
            got: magic,
        });
    }

    let version = reader.read_u32()?;
    if version == 0 || version > CURRENT_VERSION {
        return Err(ResultsError::UnsupportedVersion(version));
    }

    reader.set_version(version);
    Ok(version)
}
