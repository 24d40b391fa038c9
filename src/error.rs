use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档包（zip 容器）相关错误
    #[error("文档包错误: {0}")]
    Package(#[from] PackageError),
    /// XML 解析/序列化错误
    #[error("XML错误: {0}")]
    Xml(#[from] XmlError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 后台排版任务异常退出
    #[error("后台任务失败: {0}")]
    Task(String),
}

/// 文档包相关错误
#[derive(Debug, Error)]
pub enum PackageError {
    /// 无法读取 zip 容器
    #[error("无法读取文档包: {source}")]
    ZipRead {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 缺少必需的部件
    #[error("文档包中缺少必需的部件: {part}")]
    MissingPart { part: String },
    /// 部件不是合法的 UTF-8 文本
    #[error("部件 {part} 不是合法的 UTF-8 文本")]
    InvalidEncoding { part: String },
    /// 写出 zip 容器失败
    #[error("写出文档包失败: {source}")]
    ZipWrite {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// XML 相关错误
#[derive(Debug, Error)]
pub enum XmlError {
    /// XML 格式错误
    #[error("XML 解析失败 (位置 {position}): {message}")]
    Parse { position: u64, message: String },
    /// 文档中没有 w:body
    #[error("文档中找不到 w:body 元素")]
    MissingBody,
    /// 序列化失败
    #[error("XML 序列化失败: {message}")]
    Serialize { message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 颜色值不是 6 位十六进制
    #[error("颜色值 '{value}' 不是合法的十六进制颜色 (例如 #FF0000)")]
    InvalidColor { value: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Package(PackageError::ZipRead {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 XML 解析错误
    pub fn xml_parse(position: u64, message: impl Into<String>) -> Self {
        AppError::Xml(XmlError::Parse {
            position,
            message: message.into(),
        })
    }

    /// 创建 XML 序列化错误
    pub fn xml_serialize(message: impl Into<String>) -> Self {
        AppError::Xml(XmlError::Serialize {
            message: message.into(),
        })
    }

    /// 创建 zip 写出错误
    pub fn zip_write(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Package(PackageError::ZipWrite {
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否属于"输入文档本身有问题"（缺部件或 XML 损坏）
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            AppError::Package(PackageError::MissingPart { .. })
                | AppError::Package(PackageError::ZipRead { .. })
                | AppError::Package(PackageError::InvalidEncoding { .. })
                | AppError::Xml(XmlError::Parse { .. })
                | AppError::Xml(XmlError::MissingBody)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
