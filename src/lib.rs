// Weld seam result files: codec, storage and directory loaders
// Main library entry point

pub mod core;

// Re-export main types
pub use crate::core::batch::LoadState;
pub use crate::core::config::LoaderConfig;
pub use crate::core::error::{ResultsError, Result};
pub use crate::core::format::{
    MeasureTask, MeasureTaskPosition, MeasurementContext, Point, Range, ResultKind, ResultRecord,
    SeamResultSet,
};
pub use crate::core::loader::ResultsLoader;
pub use crate::core::serializer::ResultsSerializer;
pub use crate::core::series_loader::SeriesLoader;
pub use crate::core::writer::ResultsWriterCommand;

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(MAGIC, 0xCE98_3826);
        assert_eq!(CURRENT_VERSION, VERSION_POINT_REFERENCE);
        assert_eq!(HEADER_SIZE, 8);
    }
}
