// Encoding of a single result record
//
// Layout:
//   filterId(uuid string) resultType(i32) nioType(i32) kind(i32)
//   isNio(u8) isValid(u8)
//   count(u64) values(f64 * count) [deviation start(f64) end(f64)]   (double array only)
//   context
//   tail, depending on the stream version (see `TailLayout`)

use crate::core::constants::*;
use crate::core::context::{read_context, write_context};
use crate::core::error::{ResultsError, Result};
use crate::core::format::*;
use crate::core::wire::{WireReader, WireWriter};
use std::io::{Read, Write};

const POINT_SIZE: usize = 8 + 8;

/// Optional sections following the context, one variant per format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailLayout {
    /// Nothing after the context.
    V1,
    /// Signal quality and nio percentage.
    V2,
    /// V2 plus reference curves stored as y-only floats.
    V3,
    /// V2 plus reference curves stored as (x, y) doubles.
    V4,
}

impl TailLayout {
    pub fn for_version(version: u32) -> Result<Self> {
        match version {
            1 => Ok(TailLayout::V1),
            VERSION_SIGNAL_QUALITY => Ok(TailLayout::V2),
            VERSION_LEGACY_REFERENCE => Ok(TailLayout::V3),
            VERSION_POINT_REFERENCE => Ok(TailLayout::V4),
            other => Err(ResultsError::UnsupportedVersion(other)),
        }
    }
}

#[derive(Debug, Default)]
struct Tail {
    signal_quality: Vec<f32>,
    nio_percentage: Vec<Point>,
    upper_reference: Vec<Point>,
    lower_reference: Vec<Point>,
}

pub fn write_record<W: Write>(writer: &mut WireWriter<W>, record: &ResultRecord) -> Result<()> {
    writer.write_uuid(&record.filter_id)?;
    writer.write_i32(record.result_type)?;
    writer.write_i32(record.nio_type)?;
    writer.write_i32(record.kind.to_i32())?;
    writer.write_bool(record.is_nio)?;
    writer.write_bool(record.is_valid)?;

    match record.kind {
        ResultKind::DoubleArray => {
            writer.write_len(record.values.len())?;
            for value in &record.values {
                writer.write_f64(*value)?;
            }
            writer.write_f64(record.deviation.start)?;
            writer.write_f64(record.deviation.end)?;
        }
        ResultKind::Other(_) => writer.write_len(0)?,
    }

    write_context(writer, &record.context)?;

    writer.write_len(record.signal_quality.len())?;
    for quality in &record.signal_quality {
        writer.write_f32(*quality)?;
    }
    write_points(writer, &record.nio_percentage)?;
    write_points(writer, &record.upper_reference)?;
    write_points(writer, &record.lower_reference)
}

fn write_points<W: Write>(writer: &mut WireWriter<W>, points: &[Point]) -> Result<()> {
    writer.write_len(points.len())?;
    for point in points {
        writer.write_f64(point.x)?;
        writer.write_f64(point.y)?;
    }
    Ok(())
}

/// Decodes one record. The reader must already carry the stream version.
pub fn read_record<R: Read>(reader: &mut WireReader<R>) -> Result<ResultRecord> {
    let layout = TailLayout::for_version(reader.version())?;

    let filter_id = reader.read_uuid()?;
    let result_type = reader.read_i32()?;
    let nio_type = reader.read_i32()?;
    let kind = ResultKind::from_i32(reader.read_i32()?);
    let is_nio = reader.read_bool()?;
    let is_valid = reader.read_bool()?;

    let count = reader.read_len(8)?;
    let (values, deviation) = match kind {
        ResultKind::DoubleArray => {
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(reader.read_f64()?);
            }
            let start = reader.read_f64()?;
            let end = reader.read_f64()?;
            (values, Range::new(start, end))
        }
        ResultKind::Other(code) if count == 0 => {
            tracing::debug!("result kind {} carries no samples", code);
            (Vec::new(), Range::default())
        }
        ResultKind::Other(code) => {
            return Err(ResultsError::CorruptedData(format!(
                "result kind {} with {} samples",
                code, count
            )));
        }
    };

    let context = read_context(reader)?;

    let tail = match layout {
        TailLayout::V1 => Tail::default(),
        TailLayout::V2 => read_tail_v2(reader)?,
        TailLayout::V3 => read_tail_v3(reader, &context)?,
        TailLayout::V4 => read_tail_v4(reader)?,
    };

    // ranks are not stored
    let rank = vec![MAX_RANK; values.len()];

    Ok(ResultRecord {
        filter_id,
        result_type,
        nio_type,
        kind,
        is_nio,
        is_valid,
        values,
        rank,
        deviation,
        context,
        signal_quality: tail.signal_quality,
        nio_percentage: tail.nio_percentage,
        upper_reference: tail.upper_reference,
        lower_reference: tail.lower_reference,
    })
}

fn read_tail_v2<R: Read>(reader: &mut WireReader<R>) -> Result<Tail> {
    let count = reader.read_len(4)?;
    let mut signal_quality = Vec::with_capacity(count);
    for _ in 0..count {
        signal_quality.push(reader.read_f32()?);
    }
    let nio_percentage = read_points(reader)?;

    Ok(Tail {
        signal_quality,
        nio_percentage,
        ..Tail::default()
    })
}

fn read_tail_v3<R: Read>(reader: &mut WireReader<R>, context: &MeasurementContext) -> Result<Tail> {
    let mut tail = read_tail_v2(reader)?;
    tail.upper_reference = read_legacy_points(reader, context)?;
    tail.lower_reference = read_legacy_points(reader, context)?;
    Ok(tail)
}

fn read_tail_v4<R: Read>(reader: &mut WireReader<R>) -> Result<Tail> {
    let mut tail = read_tail_v2(reader)?;
    tail.upper_reference = read_points(reader)?;
    tail.lower_reference = read_points(reader)?;
    Ok(tail)
}

fn read_points<R: Read>(reader: &mut WireReader<R>) -> Result<Vec<Point>> {
    let count = reader.read_len(POINT_SIZE)?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = reader.read_f64()?;
        let y = reader.read_f64()?;
        points.push(Point::new(x, y));
    }
    Ok(points)
}

/// Version 3 kept only the y value of each reference sample. The samples are
/// spread evenly over one trigger interval starting at the context position;
/// x is given in millimeters.
fn read_legacy_points<R: Read>(
    reader: &mut WireReader<R>,
    context: &MeasurementContext,
) -> Result<Vec<Point>> {
    let count = reader.read_len(4)?;
    let sample_distance = if count > 0 {
        f64::from(context.trigger_delta()) / count as f64
    } else {
        0.0
    };

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let y = reader.read_f32()?;
        let x = (f64::from(context.position) + i as f64 * sample_distance) / 1000.0;
        points.push(Point::new(x, f64::from(y)));
    }
    Ok(points)
}
