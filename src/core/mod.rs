pub mod batch;
pub mod collection;
pub mod compression;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod format;
pub mod header;
pub mod layout;
pub mod loader;
pub mod metadata;
pub mod record;
pub mod serializer;
pub mod series_loader;
pub mod wire;
pub mod writer;
