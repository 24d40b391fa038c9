//! 排版处理流程 - 流程层
//!
//! 核心职责：定义"一份文档"的完整排版流程
//!
//! 流程顺序（固定，不可配置）：
//! 1. 拆分选项
//! 2. 选项标签上色
//! 3. 合并多余空格
//! 4. 加粗文字上色
//! 5. 图片居中
//! 6. 删除空行
//! 7. 扫描题目 → 插入点线
//!
//! 顺序本身就是正确性的一部分：上色要看到拆分后新建的文字块，
//! 题目扫描要看到拆分出的选项段落，插入点线前必须已经删完空行。

use serde::Serialize;
use std::fmt::Display;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::XmlDocument;
use crate::models::FormatConfig;
use crate::services;
use crate::workflow::document_ctx::DocumentCtx;

/// 各阶段的修改统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub paragraphs_split: usize,
    pub label_tabs_replaced: usize,
    pub labels_formatted: usize,
    pub text_nodes_collapsed: usize,
    pub bold_runs_colored: usize,
    pub images_centered: usize,
    pub paragraphs_removed: usize,
    pub question_groups: usize,
    pub dot_lines_inserted: usize,
}

impl Display for FormatReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "拆分 {} | 标签Tab {} | 标签上色 {} | 合并空格 {} | 加粗上色 {} | 图片居中 {} | 删除空行 {} | 题目 {} | 点线 {}",
            self.paragraphs_split,
            self.label_tabs_replaced,
            self.labels_formatted,
            self.text_nodes_collapsed,
            self.bold_runs_colored,
            self.images_centered,
            self.paragraphs_removed,
            self.question_groups,
            self.dot_lines_inserted
        )
    }
}

/// 排版处理流程
///
/// - 编排各个阶段的执行顺序
/// - 根据配置决定跳过哪些阶段
/// - 不持有文档，只在 `run` 期间独占修改它
pub struct FormatFlow<'a> {
    config: &'a FormatConfig,
}

impl<'a> FormatFlow<'a> {
    /// 创建新的排版流程
    pub fn new(config: &'a FormatConfig) -> Self {
        Self { config }
    }

    /// 按固定顺序执行全部已启用的阶段
    pub fn run(&self, doc: &mut XmlDocument, ctx: &DocumentCtx) -> AppResult<FormatReport> {
        let config = self.config;
        let mut report = FormatReport::default();

        // 在修改任何内容之前先确认文档结构可用
        doc.body()?;
        let color = if config.color_bold_text {
            Some(config.bold_color_hex()?)
        } else {
            None
        };

        if config.break_tabs_to_newlines {
            let stats = services::split_options(doc)?;
            report.paragraphs_split = stats.paragraphs_created;
            report.label_tabs_replaced = stats.label_tabs_replaced;
        }

        if let Some(color) = &color {
            report.labels_formatted = services::format_option_labels(doc, color)?;
        }

        if config.remove_extra_spaces {
            report.text_nodes_collapsed = services::collapse_spaces(doc);
        }

        if let Some(color) = &color {
            report.bold_runs_colored = services::color_bold_runs(doc, color);
        }

        if config.center_images {
            report.images_centered = services::center_images(doc)?;
        }

        if config.remove_empty_lines {
            report.paragraphs_removed = services::remove_empty_paragraphs(doc)?;
        }

        if config.dot_lines_count > 0 {
            let groups = services::scan_questions(doc)?;
            report.question_groups = groups.len();
            report.dot_lines_inserted =
                services::insert_dot_lines(doc, &groups, config.dot_lines_count);
        }

        info!("{} ✓ 排版完成: {}", ctx, report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xml_tree::tests::{paragraph_texts, wrap_body};
    use crate::infrastructure::Tag;
    use crate::services::DOT_LINE;

    fn ctx() -> DocumentCtx {
        DocumentCtx::new(1, "test.docx")
    }

    fn full_config() -> FormatConfig {
        FormatConfig {
            break_tabs_to_newlines: true,
            color_bold_text: true,
            bold_color: "#c00000".to_string(),
            remove_extra_spaces: true,
            center_images: true,
            remove_empty_lines: true,
            dot_lines_count: 2,
        }
    }

    #[test]
    fn test_split_only_scenario() {
        let config = FormatConfig {
            break_tabs_to_newlines: true,
            ..Default::default()
        };
        let mut doc = XmlDocument::parse(&wrap_body(
            "<w:p><w:r><w:t>A.</w:t><w:tab/><w:t>foo</w:t><w:tab/><w:t>B.</w:t><w:tab/><w:t>bar</w:t></w:r></w:p>",
        ))
        .unwrap();

        let report = FormatFlow::new(&config).run(&mut doc, &ctx()).unwrap();

        assert_eq!(paragraph_texts(&doc), vec!["A. foo", "B. bar"]);
        assert_eq!(report.paragraphs_split, 1);
        assert_eq!(report.labels_formatted, 0);
    }

    #[test]
    fn test_noop_config_leaves_document_unchanged() {
        let xml = wrap_body(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>A.  x</w:t><w:tab/><w:t>B. y</w:t></w:r></w:p><w:p/>",
        );
        let mut doc = XmlDocument::parse(&xml).unwrap();
        let before = doc.to_xml().unwrap();

        let report = FormatFlow::new(&FormatConfig::default())
            .run(&mut doc, &ctx())
            .unwrap();

        assert_eq!(report, FormatReport::default());
        assert_eq!(doc.to_xml().unwrap(), before);
    }

    #[test]
    fn test_full_pipeline() {
        let body = concat!(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Câu 1:</w:t></w:r><w:r><w:t xml:space=\"preserve\">  Chọn   đáp án đúng</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>A.</w:t><w:tab/><w:t>1</w:t><w:tab/><w:t>B.</w:t><w:tab/><w:t>2</w:t></w:r></w:p>",
            "<w:p/>",
            "<w:p><w:r><w:drawing/></w:r></w:p>",
            "<w:p><w:r><w:t>Câu 2. Tính</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>C) 3</w:t><w:tab/><w:t>D) 4</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>HẾT</w:t></w:r></w:p>",
            "<w:sectPr/>",
        );
        let mut doc = XmlDocument::parse(&wrap_body(body)).unwrap();

        let report = FormatFlow::new(&full_config()).run(&mut doc, &ctx()).unwrap();

        let d = DOT_LINE.to_string();
        assert_eq!(
            paragraph_texts(&doc),
            vec![
                "Câu 1: Chọn đáp án đúng".to_string(),
                "A. 1".to_string(),
                "B. 2".to_string(),
                String::new(), // 图片段落
                d.clone(),
                d.clone(),
                "Câu 2. Tính".to_string(),
                "C) 3".to_string(),
                "D) 4".to_string(),
                d.clone(),
                d,
                "HẾT".to_string(),
            ]
        );
        assert_eq!(report.paragraphs_split, 2);
        assert_eq!(report.labels_formatted, 4);
        // "Câu 1:" 原本加粗 + 4 个选项标签
        assert_eq!(report.bold_runs_colored, 5);
        assert_eq!(report.images_centered, 1);
        assert_eq!(report.paragraphs_removed, 1);
        assert_eq!(report.question_groups, 2);
        assert_eq!(report.dot_lines_inserted, 4);

        let body = doc.body().unwrap();
        let last = *doc.child_elements(body).last().unwrap();
        assert_eq!(doc.tag(last), Tag::SectionProps);
    }

    #[test]
    fn test_invalid_color_fails_before_mutation() {
        let config = FormatConfig {
            break_tabs_to_newlines: true,
            color_bold_text: true,
            bold_color: "not-a-color".to_string(),
            ..Default::default()
        };
        let mut doc = XmlDocument::parse(&wrap_body(
            "<w:p><w:r><w:t>A. x</w:t><w:tab/><w:t>B. y</w:t></w:r></w:p>",
        ))
        .unwrap();

        assert!(FormatFlow::new(&config).run(&mut doc, &ctx()).is_err());
        assert_eq!(paragraph_texts(&doc).len(), 1);
    }
}
