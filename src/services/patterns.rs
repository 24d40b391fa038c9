//! 题目 / 选项识别用的正则

use regex::Regex;
use std::sync::LazyLock;

/// 文本中任意位置出现选项标签（A. / B: / C) ...）
pub static OPTION_MARKER_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-D][.:)]").expect("valid regex"));

/// 以选项标签开头（允许前导空白）
pub static OPTION_MARKER_AT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[A-D][.:)]").expect("valid regex"));

/// 以"孤立的"选项标签结尾，例如 `...  B.` 或 `A. `
pub static OPTION_LABEL_AT_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?:^|[\\s\u{00A0}])[A-D][.:)]\\s*$").expect("valid regex"));

/// 题号 "Câu 12:" / "câu 3."
pub static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Câu\s+(\d+)[:.]").expect("valid regex"));

/// 结束标记 "HẾT" 或 "----- HẾT -----"
pub static END_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HẾT\s*$|^-+\s*HẾT\s*-+$").expect("valid regex"));

/// 连续两个以上的空白或不可见字符
pub static REPEATED_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[ \t\u{00A0}\u{2002}-\u{200B}]{2,}").expect("valid regex")
});

/// 空白或零宽空格
pub fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{200B}'
}

/// 文本为空或只由空白 / 零宽空格组成
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_blank_char)
}
