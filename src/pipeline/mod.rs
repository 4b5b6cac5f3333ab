//! Byte sources for the two upload modes
//!
//! - [`image_export`]: `docker save` piped straight into the upload
//! - [`local_file`]: a file on disk
//! - [`probe`]: size hint for the export stream

pub mod image_export;
pub mod local_file;
pub mod probe;

pub use image_export::ImageExport;
pub use local_file::LocalFile;
pub use probe::probe_image_size;
