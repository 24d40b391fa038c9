//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、加载并校验排版配置
//! 2. **批量扫描**：收集输入目录中所有待处理的 docx（`Vec<PathBuf>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **失败隔离**：一份文档失败只记一次失败，不影响其他文档
//! - **向下委托**：委托 document_processor 处理单个文档

use crate::config::Config;
use crate::models::{collect_docx_files, load_format_config, FormatConfig};
use crate::orchestrator::document_processor;
use crate::orchestrator::report_writer::ReportWriter;
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_files_found, log_startup,
    print_final_stats,
};
use crate::workflow::DocumentCtx;
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    format_config: Arc<FormatConfig>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(
            config.max_concurrent_files,
            &config.input_folder,
            &config.output_folder,
        );

        let format_config = load_format_config(Path::new(&config.format_config_file))
            .await
            .with_context(|| format!("加载排版配置失败: {}", config.format_config_file))?;
        info!("⚙️ 排版配置: {:?}", format_config);

        if format_config.is_noop() {
            warn!("⚠️ 所有排版选项均未开启，输出将与输入内容一致");
        }

        Ok(Self {
            config,
            format_config: Arc::new(format_config),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描待处理的文档...");
        let files = collect_docx_files(&self.config.input_folder)
            .await
            .with_context(|| format!("扫描输入目录失败: {}", self.config.input_folder))?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待处理的 docx 文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_files_found(files.len(), self.config.max_concurrent_files);

        tokio::fs::create_dir_all(&self.config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_folder))?;

        // 处理所有文档
        let stats = self.process_all_files(files).await?;

        // 输出最终统计
        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 处理所有文档
    async fn process_all_files(&self, files: Vec<PathBuf>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_files.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_files = files.len();
        let total_batches = total_files.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_files,
            ..Default::default()
        };

        // 分批处理
        for batch_start in (0..total_files).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(total_files);
            let batch_num = batch_start / batch_size + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end,
                total_files,
            );

            let batch_result = self
                .process_batch(&files[batch_start..batch_end], batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_files: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, input) in batch_files.iter().enumerate() {
            let file_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());
            let ctx = DocumentCtx::new(file_index, file_name.clone());
            let input = input.clone();
            let output = Path::new(&self.config.output_folder).join(&file_name);
            let format_config = self.format_config.clone();
            let writer = ReportWriter::with_path(self.config.output_log_file.clone());

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match document_processor::process_document(&input, &output, &format_config, &ctx)
                    .await
                {
                    Ok(report) => {
                        if let Err(e) = writer.write_success(&ctx, &report).await {
                            warn!("{} 写入处理记录失败: {}", ctx, e);
                        }
                        true
                    }
                    Err(e) => {
                        if e.is_bad_input() {
                            warn!("{} ⚠️ 文档内容无法识别，已跳过: {}", ctx, e);
                        } else {
                            error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                        }
                        if let Err(e) = writer.write_failure(&ctx, &e.to_string()).await {
                            warn!("{} 写入处理记录失败: {}", ctx, e);
                        }
                        false
                    }
                }
            });
            batch_handles.push((file_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();

        let (indices, handles): (Vec<usize>, Vec<_>) = batch_handles.into_iter().unzip();
        let outcomes = join_all(handles).await;

        for (file_index, outcome) in indices.into_iter().zip(outcomes) {
            match outcome {
                Ok(true) => result.success += 1,
                Ok(false) => result.failed += 1,
                Err(e) => {
                    error!("[文档 #{}] 任务执行失败: {}", file_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}
