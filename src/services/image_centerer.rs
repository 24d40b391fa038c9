//! 图片居中 - 业务能力层

use crate::error::AppResult;
use crate::infrastructure::{Tag, XmlDocument};
use tracing::debug;

/// 含图片（`w:drawing` / `w:pict`）的段落设为居中，返回处理的段落数
///
/// 只含 `w:object`（例如 MathType 公式）的段落不处理，否则普通文字段落里的行内公式会被一起居中
pub fn center_images(doc: &mut XmlDocument) -> AppResult<usize> {
    let body = doc.body()?;
    let paragraphs = doc.elements_with_tag(body, Tag::Paragraph);
    let mut centered = 0;

    for paragraph in paragraphs {
        let has_image = doc.contains_tag(paragraph, Tag::Drawing)
            || doc.contains_tag(paragraph, Tag::Picture);
        if !has_image {
            continue;
        }

        let ppr = doc.ensure_properties(paragraph, Tag::ParagraphProps);
        let jc = doc.upsert_property(ppr, "jc");
        doc.set_w_attr(jc, "val", "center");
        centered += 1;
    }

    debug!("图片居中: {} 个段落", centered);
    Ok(centered)
}
