//! 题目扫描 - 业务能力层
//!
//! 只负责"把 body 的直接子元素按题号分组"，不修改文档

use crate::error::AppResult;
use crate::infrastructure::{Tag, XmlDocument};
use crate::models::QuestionGroup;
use crate::services::patterns::{END_MARKER, QUESTION_LABEL};
use crate::utils::truncate_text;
use tracing::debug;

/// 扫描题目分组
///
/// - "Câu N:" 段落开启新的一组
/// - "HẾT" 段落结束当前分组，之后的元素在下一个题号出现前不归属任何题
/// - 其余元素（包括表格等非段落元素）追加到当前分组
/// - `w:sectPr` 是节属性而非正文内容，永远不参与分组
pub fn scan_questions(doc: &XmlDocument) -> AppResult<Vec<QuestionGroup>> {
    let body = doc.body()?;
    let mut groups: Vec<QuestionGroup> = Vec::new();
    let mut in_group = false;

    for element in doc.child_elements(body) {
        match doc.tag(element) {
            Tag::SectionProps => continue,
            Tag::Paragraph => {
                let text = doc.visible_text(element);

                if END_MARKER.is_match(&text) {
                    in_group = false;
                    continue;
                }

                if QUESTION_LABEL.is_match(&text) {
                    debug!("第 {} 组: {}", groups.len(), truncate_text(&text, 30));
                    groups.push(QuestionGroup::new(groups.len(), element));
                    in_group = true;
                    continue;
                }
            }
            _ => {}
        }

        if in_group {
            if let Some(current) = groups.last_mut() {
                current.elements.push(element);
            }
        }
    }

    debug!("扫描到 {} 道题", groups.len());
    Ok(groups)
}
