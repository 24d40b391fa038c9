//! 删除空行 - 业务能力层

use crate::error::AppResult;
use crate::infrastructure::{Tag, XmlDocument};
use crate::services::patterns::is_blank;
use indextree::NodeId;
use tracing::debug;

/// 删除没有可见文字、也没有图片 / 图形 / 嵌入对象 / 公式 / 符号 / 分页符的段落，返回删除数
///
/// 以下段落即使为空也保留，否则文档结构会损坏：
/// - 段落属性里带节属性（`w:sectPr`，分节符）
/// - 表格单元格、文本框中的最后一个块级元素
pub fn remove_empty_paragraphs(doc: &mut XmlDocument) -> AppResult<usize> {
    let body = doc.body()?;
    let paragraphs = doc.elements_with_tag(body, Tag::Paragraph);
    let mut removed = 0;

    for paragraph in paragraphs {
        if !doc.is_attached(paragraph) || has_content(doc, paragraph) {
            continue;
        }
        if carries_section_break(doc, paragraph) || is_last_block_in_container(doc, paragraph, body)
        {
            continue;
        }

        doc.detach(paragraph);
        removed += 1;
    }

    debug!("删除空行: {} 个段落", removed);
    Ok(removed)
}

fn has_content(doc: &XmlDocument, paragraph: NodeId) -> bool {
    let has_media = [
        Tag::Drawing,
        Tag::Picture,
        Tag::Shape,
        Tag::Object,
        Tag::Math,
        Tag::Symbol,
    ]
        .into_iter()
        .any(|tag| doc.contains_tag(paragraph, tag));
    if has_media {
        return true;
    }

    let has_page_break = doc
        .elements_with_tag(paragraph, Tag::Break)
        .into_iter()
        .any(|br| doc.w_attr(br, "type") == Some("page"));

    has_page_break || !is_blank(&doc.visible_text(paragraph))
}

fn carries_section_break(doc: &XmlDocument, paragraph: NodeId) -> bool {
    doc.first_child_with_tag(paragraph, Tag::ParagraphProps)
        .is_some_and(|ppr| doc.first_child_with_tag(ppr, Tag::SectionProps).is_some())
}

/// 单元格 / 文本框至少要保留一个块级元素
fn is_last_block_in_container(doc: &XmlDocument, paragraph: NodeId, body: NodeId) -> bool {
    let Some(parent) = doc.parent(paragraph) else {
        return false;
    };
    if parent == body {
        return false;
    }

    !doc.child_elements(parent)
        .into_iter()
        .any(|sibling| {
            sibling != paragraph && matches!(doc.tag(sibling), Tag::Paragraph | Tag::Table)
        })
}
