// Length-prefixed sequences of result records

use crate::core::error::Result;
use crate::core::format::ResultRecord;
use crate::core::header::{verify_header, write_header};
use crate::core::record::{read_record, write_record};
use crate::core::wire::{WireReader, WireWriter};
use std::io::{Read, Write};
use tracing::warn;

// uuid length prefix + 36 characters + type/nio/kind + flags + sample count
const MIN_RECORD_SIZE: usize = 8 + 36 + 3 * 4 + 2 + 8;

pub fn encode_records<W: Write>(writer: &mut WireWriter<W>, records: &[ResultRecord]) -> Result<()> {
    writer.write_len(records.len())?;
    for record in records {
        write_record(writer, record)?;
    }
    Ok(())
}

pub fn decode_records<R: Read>(reader: &mut WireReader<R>) -> Result<Vec<ResultRecord>> {
    let count = reader.read_len(MIN_RECORD_SIZE)?;
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(read_record(reader)?);
    }
    Ok(records)
}

/// Header followed by the records, uncompressed.
pub fn serialize_records(records: &[ResultRecord]) -> Result<Vec<u8>> {
    let mut writer = WireWriter::new(Vec::new());
    write_header(&mut writer)?;
    encode_records(&mut writer, records)?;
    Ok(writer.into_inner())
}

pub fn try_deserialize_records(data: &[u8]) -> Result<Vec<ResultRecord>> {
    let mut reader = WireReader::from_slice(data);
    verify_header(&mut reader)?;
    decode_records(&mut reader)
}

/// Decodes a whole stream. Any failure yields an empty vector; records read
/// before the failure are dropped.
pub fn deserialize_records(data: &[u8]) -> Vec<ResultRecord> {
    if data.is_empty() {
        return Vec::new();
    }
    try_deserialize_records(data).unwrap_or_else(|e| {
        warn!("Discarding undecodable result stream: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{CURRENT_VERSION, MAGIC};
    use crate::core::error::ResultsError;
    use crate::core::format::{MeasurementContext, Range};
    use uuid::Uuid;

    fn records() -> Vec<ResultRecord> {
        let mut values = vec![0.0, 0.1, 1.0];
        let first = ResultRecord::double_array(
            Uuid::new_v4(),
            10,
            1000,
            MeasurementContext::default(),
            values.clone(),
            Vec::new(),
            Range::new(0.0, 2.0),
            true,
        );
        values.push(2.0);
        let second = ResultRecord::double_array(
            Uuid::new_v4(),
            2,
            1001,
            MeasurementContext::default(),
            values.clone(),
            Vec::new(),
            Range::new(0.0, 3.0),
            false,
        );
        values.push(3.0);
        let third = ResultRecord::double_array(
            Uuid::new_v4(),
            7,
            1001,
            MeasurementContext::default(),
            values,
            Vec::new(),
            Range::new(1.0, 3.5),
            false,
        );
        vec![first, second, third]
    }

    #[test]
    fn test_insertion_order_preserved() {
        let original = records();
        let data = serialize_records(&original).unwrap();
        let decoded = deserialize_records(&data);

        assert_eq!(decoded.len(), 3);
        for (got, want) in decoded.iter().zip(&original) {
            assert_eq!(got.filter_id, want.filter_id);
            assert_eq!(got.result_type, want.result_type);
            assert_eq!(got.nio_type, want.nio_type);
            assert_eq!(got.is_nio, want.is_nio);
            assert!(got.is_valid);
            assert_eq!(got.values, want.values);
            assert_eq!(got.deviation, want.deviation);
        }
        assert_eq!(decoded[2].values.len(), 5);
    }

    #[test]
    fn test_empty_collection() {
        let data = serialize_records(&[]).unwrap();
        assert!(try_deserialize_records(&data).unwrap().is_empty());
    }

    #[test]
    fn test_truncation_discards_partial_records() {
        let data = serialize_records(&records()).unwrap();
        let cut = &data[..data.len() - 5];
        assert!(try_deserialize_records(cut).is_err());
        assert!(deserialize_records(cut).is_empty());
    }

    #[test]
    fn test_bad_magic_gives_empty() {
        let mut data = serialize_records(&records()).unwrap();
        data[..4].copy_from_slice(&(MAGIC + 1).to_le_bytes());
        assert!(matches!(
            try_deserialize_records(&data),
            Err(ResultsError::InvalidMagic { .. })
        ));
        assert!(deserialize_records(&data).is_empty());
    }

    #[test]
    fn test_future_version_gives_empty() {
        let mut data = serialize_records(&records()).unwrap();
        data[4..8].copy_from_slice(&(CURRENT_VERSION + 1).to_le_bytes());
        assert!(deserialize_records(&data).is_empty());
    }

    #[test]
    fn test_huge_count_rejected() {
        let mut writer = WireWriter::new(Vec::new());
        write_header(&mut writer).unwrap();
        writer.write_u64(u64::MAX).unwrap();
        let data = writer.into_inner();
        assert!(matches!(
            try_deserialize_records(&data),
            Err(ResultsError::CorruptedData(_))
        ));
    }
}
