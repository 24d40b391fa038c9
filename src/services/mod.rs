pub mod bold_colorizer;
pub mod dot_line_inserter;
pub mod empty_paragraph_pruner;
pub mod image_centerer;
pub mod label_formatter;
pub mod option_splitter;
pub mod patterns;
pub mod question_scanner;
pub mod whitespace_normalizer;

pub use bold_colorizer::color_bold_runs;
pub use dot_line_inserter::{insert_dot_lines, DOT_LINE};
pub use empty_paragraph_pruner::remove_empty_paragraphs;
pub use image_centerer::center_images;
pub use label_formatter::format_option_labels;
pub use option_splitter::{split_options, SplitStats, LOOKAHEAD_LIMIT};
pub use question_scanner::scan_questions;
pub use whitespace_normalizer::collapse_spaces;
