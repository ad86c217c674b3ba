// Data structures persisted in result files

use crate::core::constants::{KIND_DOUBLE_ARRAY, MAX_RANK};
use serde::Serialize;
use uuid::Uuid;

/// Where an image sits inside its measure task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MeasureTaskPosition {
    NoImage,
    First,
    #[default]
    Middle,
    Last,
}

impl MeasureTaskPosition {
    pub fn from_i32(val: i32) -> Self {
        match val {
            -1 => MeasureTaskPosition::First,
            0 => MeasureTaskPosition::Middle,
            1 => MeasureTaskPosition::Last,
            _ => MeasureTaskPosition::NoImage,
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            MeasureTaskPosition::NoImage => -999,
            MeasureTaskPosition::First => -1,
            MeasureTaskPosition::Middle => 0,
            MeasureTaskPosition::Last => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MeasureTask {
    /// Microseconds between two trigger pulses.
    pub trigger_delta: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementContext {
    pub sampling_x: f64,
    pub sampling_y: f64,
    pub position_flag: MeasureTaskPosition,
    pub image_number: i32,
    /// Position along the seam in micrometers.
    pub position: i32,
    pub relative_time: i32,
    pub hw_roi_x0: i32,
    pub hw_roi_y0: i32,
    pub task: MeasureTask,
}

impl Default for MeasurementContext {
    fn default() -> Self {
        Self {
            sampling_x: 1.0,
            sampling_y: 1.0,
            position_flag: MeasureTaskPosition::default(),
            image_number: 0,
            position: 0,
            relative_time: 0,
            hw_roi_x0: 0,
            hw_roi_y0: 0,
            task: MeasureTask::default(),
        }
    }
}

impl MeasurementContext {
    pub fn trigger_delta(&self) -> i32 {
        self.task.trigger_delta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultKind {
    DoubleArray,
    Other(i32),
}

impl ResultKind {
    pub fn from_i32(val: i32) -> Self {
        if val == KIND_DOUBLE_ARRAY {
            ResultKind::DoubleArray
        } else {
            ResultKind::Other(val)
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            ResultKind::DoubleArray => KIND_DOUBLE_ARRAY,
            ResultKind::Other(val) => val,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One persisted inspection result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub filter_id: Uuid,
    pub result_type: i32,
    pub nio_type: i32,
    pub kind: ResultKind,
    pub is_nio: bool,
    pub is_valid: bool,
    pub values: Vec<f64>,
    pub rank: Vec<u8>,
    pub deviation: Range,
    pub context: MeasurementContext,
    pub signal_quality: Vec<f32>,
    pub nio_percentage: Vec<Point>,
    pub upper_reference: Vec<Point>,
    pub lower_reference: Vec<Point>,
}

impl ResultRecord {
    /// Builds a double array result. Validity follows from having samples and
    /// `rank` is fitted to the number of values.
    #[allow(clippy::too_many_arguments)]
    pub fn double_array(
        filter_id: Uuid,
        result_type: i32,
        nio_type: i32,
        context: MeasurementContext,
        values: Vec<f64>,
        mut rank: Vec<u8>,
        deviation: Range,
        is_nio: bool,
    ) -> Self {
        rank.resize(values.len(), MAX_RANK);
        Self {
            filter_id,
            result_type,
            nio_type,
            kind: ResultKind::DoubleArray,
            is_nio,
            is_valid: !values.is_empty(),
            values,
            rank,
            deviation,
            context,
            signal_quality: Vec::new(),
            nio_percentage: Vec::new(),
            upper_reference: Vec::new(),
            lower_reference: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Records of one result file together with the seam they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeamResultSet {
    pub seam_number: u32,
    pub seam_uuid: Uuid,
    pub results: Vec<ResultRecord>,
}
