// Fixed-width primitive encoding shared by every structure in a result stream

use crate::core::error::{ResultsError, Result};
use std::io::{Read, Write};
use uuid::Uuid;

/// Append-only encoder over any `Write` sink (usually a `Vec<u8>`).
pub struct WireWriter<W: Write> {
    out: W,
}

impl<W: Write> WireWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.out.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.out.write_all(&[u8::from(value)])?;
        Ok(())
    }

    pub fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_u64(len as u64)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_len(bytes.len())?;
        self.out.write_all(bytes)?;
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// UUIDs travel as their hyphenated string form.
    pub fn write_uuid(&mut self, id: &Uuid) -> Result<()> {
        let mut buf = Uuid::encode_buffer();
        let text = id.hyphenated().encode_lower(&mut buf);
        self.write_string(text)
    }
}

/// Decoder over an in-memory result stream. Carries the format version parsed
/// from the stream header so nested structures can decode conditionally on it.
/// The buffer length is known up front, so every count read from the stream
/// is checked against what is actually left before anything is allocated.
pub struct WireReader<R: Read> {
    input: R,
    version: u32,
    remaining: u64,
}

impl<'a> WireReader<&'a [u8]> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            input: data,
            version: 0,
            remaining: data.len() as u64,
        }
    }
}

impl<R: Read> WireReader<R> {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.input.read_exact(&mut buf)?;
        self.remaining = self.remaining.saturating_sub(N as u64);
        Ok(buf)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte != 0)
    }

    /// Reads a 64-bit element count and rejects it if `count * elem_size`
    /// cannot fit in what is left of the input.
    pub fn read_len(&mut self, elem_size: usize) -> Result<usize> {
        let count = self.read_u64()?;
        let needed = count.checked_mul(elem_size.max(1) as u64);
        if needed.map_or(true, |n| n > self.remaining) {
            return Err(ResultsError::CorruptedData(format!(
                "count {} exceeds remaining {} bytes",
                count, self.remaining
            )));
        }
        usize::try_from(count)
            .map_err(|_| ResultsError::CorruptedData(format!("count {} too large", count)))
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len(1)?;
        let mut buf = vec![0u8; len];
        self.input.read_exact(&mut buf)?;
        self.remaining = self.remaining.saturating_sub(len as u64);
        Ok(buf)
    }

    pub fn read_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_bytes()?)?)
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let text = self.read_string()?;
        Ok(Uuid::parse_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_roundtrip() {
        let id = Uuid::new_v4();
        let mut writer = WireWriter::new(Vec::new());
        writer.write_uuid(&id).unwrap();
        let data = writer.into_inner();
        // 8 byte length + 36 characters
        assert_eq!(data.len(), 8 + 36);

        let mut reader = WireReader::from_slice(&data);
        assert_eq!(reader.read_uuid().unwrap(), id);
    }

    #[test]
    fn test_truncated_read_is_io_error() {
        let data = [1u8, 2, 3];
        let mut reader = WireReader::from_slice(&data);
        match reader.read_u32() {
            Err(ResultsError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_oversized_count_rejected() {
        let mut writer = WireWriter::new(Vec::new());
        writer.write_u64(u64::MAX / 2).unwrap();
        writer.write_f64(1.0).unwrap();
        let data = writer.into_inner();

        let mut reader = WireReader::from_slice(&data);
        assert!(matches!(
            reader.read_len(8),
            Err(ResultsError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_oversized_string_not_allocated() {
        let mut writer = WireWriter::new(Vec::new());
        writer.write_u64(u64::MAX / 2).unwrap();
        writer.write_u32(0x4142_4344).unwrap();
        let data = writer.into_inner();

        let mut reader = WireReader::from_slice(&data);
        assert!(matches!(
            reader.read_bytes(),
            Err(ResultsError::CorruptedData(_))
        ));
    }

    #[test]
    fn test_count_checked_against_consumed_input() {
        let mut writer = WireWriter::new(Vec::new());
        writer.write_f64(0.5).unwrap();
        writer.write_u64(2).unwrap();
        writer.write_f64(1.0).unwrap();
        let data = writer.into_inner();

        let mut reader = WireReader::from_slice(&data);
        reader.read_f64().unwrap();
        // two doubles announced, one left
        assert!(reader.read_len(8).is_err());
    }
}
