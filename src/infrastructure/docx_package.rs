//! docx 文档包 - 基础设施层
//!
//! 只负责 zip 容器的读写：读出全部部件，替换正文部件，原样写回其余部件

use crate::error::{AppError, AppResult, PackageError};
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// 正文部件在包内的固定路径
pub const DOCUMENT_PART: &str = "word/document.xml";

/// 包内的单个部件
#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    stored: bool,
    is_dir: bool,
}

/// 内存中的 docx 包
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// 从 zip 字节读取所有部件（保持原有顺序）
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data).map_err(|e| {
                AppError::Package(PackageError::ZipRead {
                    source: Box::new(e),
                })
            })?;

            entries.push(PackageEntry {
                name: file.name().to_string(),
                stored: file.compression() == CompressionMethod::Stored,
                is_dir: file.is_dir(),
                data,
            });
        }

        debug!("读取文档包: {} 个部件", entries.len());
        Ok(Self { entries })
    }

    /// 部件名列表
    pub fn part_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// 读取指定部件的原始字节
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name && !e.is_dir)
            .map(|e| e.data.as_slice())
    }

    /// 读取正文 `word/document.xml`
    pub fn document_xml(&self) -> AppResult<&str> {
        let data = self.part(DOCUMENT_PART).ok_or_else(|| {
            AppError::Package(PackageError::MissingPart {
                part: DOCUMENT_PART.to_string(),
            })
        })?;
        std::str::from_utf8(data).map_err(|_| {
            AppError::Package(PackageError::InvalidEncoding {
                part: DOCUMENT_PART.to_string(),
            })
        })
    }

    /// 替换部件内容；不存在时追加
    pub fn replace_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                stored: false,
                is_dir: false,
            }),
        }
    }

    /// 写回 zip 字节
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = if entry.stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(AppError::zip_write)?;
                continue;
            }

            writer
                .start_file(entry.name.as_str(), options)
                .map_err(AppError::zip_write)?;
            writer.write_all(&entry.data).map_err(AppError::zip_write)?;
        }

        let cursor = writer.finish().map_err(AppError::zip_write)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_zip(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_replace_document_keeps_other_parts() {
        let bytes = build_zip(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCUMENT_PART, "<old/>"),
            ("word/styles.xml", "<w:styles/>"),
        ]);

        let mut package = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(package.document_xml().unwrap(), "<old/>");

        package.replace_part(DOCUMENT_PART, b"<new/>".to_vec());
        let reread = DocxPackage::from_bytes(&package.to_bytes().unwrap()).unwrap();

        assert_eq!(
            reread.part_names(),
            vec!["[Content_Types].xml", DOCUMENT_PART, "word/styles.xml"]
        );
        assert_eq!(reread.document_xml().unwrap(), "<new/>");
        assert_eq!(reread.part("word/styles.xml").unwrap(), b"<w:styles/>");
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = build_zip(&[("word/styles.xml", "<w:styles/>")]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();

        let err = package.document_xml().unwrap_err();
        assert!(matches!(
            err,
            AppError::Package(PackageError::MissingPart { ref part }) if part == DOCUMENT_PART
        ));
        assert!(err.is_bad_input());
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxPackage::from_bytes(b"definitely not a zip");
        assert!(matches!(
            result,
            Err(AppError::Package(PackageError::ZipRead { .. }))
        ));
    }
}
