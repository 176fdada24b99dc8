//! Filesystem persistence for scrubbed images

mod local_file_writer;

pub use local_file_writer::{LocalFileWriter, output_path_in, sibling_output_path};
