//! 文档处理上下文
//!
//! 封装"我正在处理第几个文件、是哪个文件"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文件在本次批处理中的序号（从1开始，仅用于日志显示）
    pub file_index: usize,

    /// 文件名
    pub file_name: String,
}

impl DocumentCtx {
    /// 创建新的文档上下文
    pub fn new(file_index: usize, file_name: impl Into<String>) -> Self {
        Self {
            file_index,
            file_name: file_name.into(),
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 #{} {}]", self.file_index, self.file_name)
    }
}
