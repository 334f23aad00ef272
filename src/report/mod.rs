pub mod generator;

pub use generator::{export_file_name, render_export};
