//! 处理记录写入 - 编排层辅助
//!
//! 只负责"往日志文件追加一行记录"，不关心流程

use crate::error::{AppError, AppResult};
use crate::workflow::{DocumentCtx, FormatReport};
use serde_json::json;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 处理记录写入器
///
/// 每份文档一行 JSON：成功时记录各阶段统计，失败时记录错误信息
pub struct ReportWriter {
    log_file_path: String,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    /// 写入成功记录
    pub async fn write_success(&self, ctx: &DocumentCtx, report: &FormatReport) -> AppResult<()> {
        let line = json!({
            "file": ctx.file_name,
            "index": ctx.file_index,
            "status": "ok",
            "report": report,
        });
        self.append(&line.to_string()).await
    }

    /// 写入失败记录
    pub async fn write_failure(&self, ctx: &DocumentCtx, error: &str) -> AppResult<()> {
        let line = json!({
            "file": ctx.file_name,
            "index": ctx.file_index,
            "status": "failed",
            "error": error,
        });
        self.append(&line.to_string()).await
    }

    async fn append(&self, line: &str) -> AppResult<()> {
        debug!("写入处理记录: {}", line);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;
        // tokio 的文件写入在后台线程完成，flush 之后才算真正落盘
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        Ok(())
    }
}
