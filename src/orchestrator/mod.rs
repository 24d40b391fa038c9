//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描输入目录（Vec<PathBuf>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 读取 → 排版 → 写出 三个阶段
//! - 对外暴露同步入口 `format_package_bytes` / `format_document_xml`
//!
//! ### `report_writer` - 处理记录
//! - 每份文档在日志文件中追加一行 JSON
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! document_processor (处理单个 docx)
//!     ↓
//! workflow::FormatFlow (固定顺序执行各阶段)
//!     ↓
//! services (能力层：拆分 / 上色 / 居中 / 删除空行 / 点线)
//!     ↓
//! infrastructure (基础设施：DocxPackage、XmlDocument)
//! ```

pub mod batch_processor;
pub mod document_processor;
pub mod report_writer;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use document_processor::{format_document_xml, format_package_bytes, process_document};
pub use report_writer::ReportWriter;
