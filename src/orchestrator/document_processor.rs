//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一份 docx 的完整处理，分为三个阶段，缓冲区依次交给下一阶段：
//!
//! 1. **读取**：异步读入整个文件（`Vec<u8>`）
//! 2. **排版**：解包 → 解析 `word/document.xml` → 执行 `FormatFlow` → 序列化 → 重新打包
//!    （同步，在 `spawn_blocking` 线程上执行，中途没有挂起点）
//! 3. **写出**：异步写出新的 docx
//!
//! 任何一个阶段失败都会中止这份文档的处理；没有重试。

use crate::error::{AppError, AppResult};
use crate::infrastructure::{DocxPackage, XmlDocument, DOCUMENT_PART};
use crate::models::FormatConfig;
use crate::workflow::{DocumentCtx, FormatFlow, FormatReport};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// 对 `document.xml` 文本执行排版流程
pub fn format_document_xml(
    xml: &str,
    config: &FormatConfig,
    ctx: &DocumentCtx,
) -> AppResult<(String, FormatReport)> {
    let mut doc = XmlDocument::parse(xml)?;
    let report = FormatFlow::new(config).run(&mut doc, ctx)?;
    let output = doc.to_xml()?;
    Ok((output, report))
}

/// 对整个 docx 包执行排版流程，只替换正文部件
pub fn format_package_bytes(
    bytes: &[u8],
    config: &FormatConfig,
    ctx: &DocumentCtx,
) -> AppResult<(Vec<u8>, FormatReport)> {
    let mut package = DocxPackage::from_bytes(bytes)?;
    let (xml, report) = format_document_xml(package.document_xml()?, config, ctx)?;

    package.replace_part(DOCUMENT_PART, xml.into_bytes());
    let output = package.to_bytes()?;
    Ok((output, report))
}

/// 处理单个文档文件
///
/// # 参数
/// - `input`: 源文件路径
/// - `output`: 输出文件路径（所在目录不存在时自动创建）
/// - `config`: 排版配置
/// - `ctx`: 文档上下文（用于日志）
pub async fn process_document(
    input: &Path,
    output: &Path,
    config: &FormatConfig,
    ctx: &DocumentCtx,
) -> AppResult<FormatReport> {
    info!("{} 📄 开始处理: {}", ctx, input.display());

    // ========== 阶段 1: 读取 ==========
    let source = fs::read(input)
        .await
        .map_err(|e| AppError::file_read_failed(input.display().to_string(), e))?;
    debug!("{} 读取 {} 字节", ctx, source.len());

    // ========== 阶段 2: 排版 ==========
    let task_config = config.clone();
    let task_ctx = ctx.clone();
    let (formatted, report) = tokio::task::spawn_blocking(move || {
        format_package_bytes(&source, &task_config, &task_ctx)
    })
    .await
    .map_err(|e| AppError::Task(e.to_string()))??;

    // ========== 阶段 3: 写出 ==========
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }
    fs::write(output, &formatted)
        .await
        .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

    info!("{} 💾 已保存: {}", ctx, output.display());
    Ok(report)
}
