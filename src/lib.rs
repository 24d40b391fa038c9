//! # Docx Exam Formatter
//!
//! 一个用于批量整理选择题试卷（.docx）排版的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文档数据，只暴露读写能力
//! - `DocxPackage` - zip 容器，按原顺序保存所有部件
//! - `XmlDocument` - 基于 arena 的 `document.xml` 树，节点 id 在修改中保持稳定
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个模块只做一件事
//! - `split_options` - 把一行内的多个选项拆成多段
//! - `format_option_labels` / `color_bold_runs` - 标签与加粗文字上色
//! - `collapse_spaces` / `center_images` / `remove_empty_paragraphs` - 清理排版
//! - `scan_questions` / `insert_dot_lines` - 题目分组与作答点线
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份文档"的完整排版流程
//! - `DocumentCtx` - 上下文封装（序号 + 文件名）
//! - `FormatFlow` - 固定顺序执行各阶段，返回 `FormatReport`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//! - `orchestrator/document_processor` - 单个文档处理器，读取 → 排版 → 写出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DocxPackage, XmlDocument};
pub use models::{FormatConfig, QuestionGroup};
pub use orchestrator::{
    format_document_xml, format_package_bytes, process_document, App, ProcessingStats,
};
pub use workflow::{DocumentCtx, FormatFlow, FormatReport};
