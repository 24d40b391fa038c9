use crate::error::{AppError, AppResult, FileError};
use crate::models::FormatConfig;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载排版配置
pub async fn load_format_config(toml_file_path: &Path) -> AppResult<FormatConfig> {
    let display = toml_file_path.display().to_string();

    if !fs::try_exists(toml_file_path).await.unwrap_or(false) {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    let config: FormatConfig = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: display.clone(),
        source: Box::new(e),
    })?;
    config.validate()?;

    Ok(config)
}

/// 列出文件夹中所有待处理的 docx 文件（按文件名排序）
///
/// Word 打开文档时留下的 `~$xxx.docx` 锁文件会被跳过
pub async fn collect_docx_files(folder_path: &str) -> AppResult<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !fs::try_exists(&folder).await.unwrap_or(false) {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut docx_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        let is_docx = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
        let is_lock_file = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with("~$"));

        if is_docx && !is_lock_file {
            tracing::debug!("发现文档: {}", path.display());
            docx_files.push(path);
        }
    }

    docx_files.sort();
    Ok(docx_files)
}
