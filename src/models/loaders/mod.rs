pub mod toml_loader;

pub use toml_loader::{collect_docx_files, load_format_config};
