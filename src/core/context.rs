// Measurement context encoding

use crate::core::constants::VERSION_SIGNAL_QUALITY;
use crate::core::error::Result;
use crate::core::format::{MeasureTask, MeasureTaskPosition, MeasurementContext};
use crate::core::wire::{WireReader, WireWriter};
use std::io::{Read, Write};

// samplingX(f64) samplingY(f64) posFlag imageNumber position relativeTime roiX roiY [triggerDelta]
pub const CONTEXT_V1_SIZE: usize = 8 + 8 + 6 * 4;

pub fn write_context<W: Write>(
    writer: &mut WireWriter<W>,
    context: &MeasurementContext,
) -> Result<()> {
    writer.write_f64(context.sampling_x)?;
    writer.write_f64(context.sampling_y)?;
    writer.write_i32(context.position_flag.to_i32())?;
    writer.write_i32(context.image_number)?;
    writer.write_i32(context.position)?;
    writer.write_i32(context.relative_time)?;
    writer.write_i32(context.hw_roi_x0)?;
    writer.write_i32(context.hw_roi_y0)?;
    // streams are only ever written at CURRENT_VERSION, which carries the trigger delta
    writer.write_i32(context.task.trigger_delta)
}

pub fn read_context<R: Read>(reader: &mut WireReader<R>) -> Result<MeasurementContext> {
    let sampling_x = reader.read_f64()?;
    let sampling_y = reader.read_f64()?;
    let position_flag = MeasureTaskPosition::from_i32(reader.read_i32()?);
    let image_number = reader.read_i32()?;
    let position = reader.read_i32()?;
    let relative_time = reader.read_i32()?;
    let hw_roi_x0 = reader.read_i32()?;
    let hw_roi_y0 = reader.read_i32()?;

    let task = if reader.version() >= VERSION_SIGNAL_QUALITY {
        MeasureTask {
            trigger_delta: reader.read_i32()?.max(0),
        }
    } else {
        MeasureTask::default()
    };

    Ok(MeasurementContext {
        sampling_x,
        sampling_y,
        position_flag,
        image_number,
        position,
        relative_time,
        hw_roi_x0,
        hw_roi_y0,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::CURRENT_VERSION;

    fn sample_context() -> MeasurementContext {
        MeasurementContext {
            sampling_x: 8.1,
            sampling_y: 9.2,
            position_flag: MeasureTaskPosition::Middle,
            image_number: 3,
            position: 4,
            relative_time: 5,
            hw_roi_x0: 6,
            hw_roi_y0: 7,
            task: MeasureTask { trigger_delta: 250 },
        }
    }

    #[test]
    fn test_context_current_version() {
        let ctx = sample_context();
        let mut writer = WireWriter::new(Vec::new());
        write_context(&mut writer, &ctx).unwrap();
        let data = writer.into_inner();
        assert_eq!(data.len(), CONTEXT_V1_SIZE + 4);

        let mut reader = WireReader::from_slice(&data);
        reader.set_version(CURRENT_VERSION);
        assert_eq!(read_context(&mut reader).unwrap(), ctx);
    }

    #[test]
    fn test_context_v1_has_no_trigger_delta() {
        let ctx = sample_context();
        let mut writer = WireWriter::new(Vec::new());
        write_context(&mut writer, &ctx).unwrap();
        let data = writer.into_inner();

        // a v1 stream simply ends after the ROI offsets
        let mut reader = WireReader::from_slice(&data[..CONTEXT_V1_SIZE]);
        reader.set_version(1);
        let decoded = read_context(&mut reader).unwrap();
        assert_eq!(decoded.trigger_delta(), 0);
        assert_eq!(decoded.image_number, 3);
        assert_eq!(decoded.hw_roi_y0, 7);
        assert_eq!(decoded.sampling_y, 9.2);
    }

    #[test]
    fn test_negative_trigger_delta_clamped() {
        let mut ctx = sample_context();
        ctx.task.trigger_delta = -20;
        let mut writer = WireWriter::new(Vec::new());
        write_context(&mut writer, &ctx).unwrap();
        let data = writer.into_inner();

        let mut reader = WireReader::from_slice(&data);
        reader.set_version(CURRENT_VERSION);
        assert_eq!(read_context(&mut reader).unwrap().trigger_delta(), 0);
    }
}
