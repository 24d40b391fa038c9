use crate::error::{AppResult, ConfigError};
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待处理的 docx 存放目录
    pub input_folder: String,
    /// 排版结果输出目录
    pub output_folder: String,
    /// 排版选项 TOML 文件
    pub format_config_file: String,
    /// 同时处理的文档数量
    pub max_concurrent_files: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_docx".to_string(),
            output_folder: "output_docx".to_string(),
            format_config_file: "format.toml".to_string(),
            max_concurrent_files: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    ///
    /// 设置了但无法解析的值直接报错，不会悄悄回退到默认值
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        let max_concurrent_files: usize =
            parse_env("MAX_CONCURRENT_FILES", "usize")?.unwrap_or(default.max_concurrent_files);

        Ok(Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            format_config_file: std::env::var("FORMAT_CONFIG_FILE")
                .unwrap_or(default.format_config_file),
            // 并发数为 0 时分批循环无法前进
            max_concurrent_files: max_concurrent_files.max(1),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
