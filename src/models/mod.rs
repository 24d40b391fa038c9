pub mod format_config;
pub mod loaders;
pub mod question_group;

pub use format_config::FormatConfig;
pub use loaders::{collect_docx_files, load_format_config};
pub use question_group::QuestionGroup;
