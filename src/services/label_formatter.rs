//! 选项标签上色 - 业务能力层

use crate::error::AppResult;
use crate::infrastructure::{Tag, XmlDocument};
use crate::services::patterns::OPTION_MARKER_AT_START;
use tracing::debug;

/// 把选项段落中开头的 "A." 所在文字块设为加粗并上色
///
/// 只处理每个段落中第一个以选项标签开头的文字块。返回处理的文字块数。
pub fn format_option_labels(doc: &mut XmlDocument, color_hex: &str) -> AppResult<usize> {
    let body = doc.body()?;
    let paragraphs = doc.elements_with_tag(body, Tag::Paragraph);
    let mut formatted = 0;

    for paragraph in paragraphs {
        if !OPTION_MARKER_AT_START.is_match(&doc.visible_text(paragraph)) {
            continue;
        }

        let label_run = doc
            .elements_with_tag(paragraph, Tag::Run)
            .into_iter()
            .find(|&run| OPTION_MARKER_AT_START.is_match(&doc.visible_text(run)));

        if let Some(run) = label_run {
            let rpr = doc.ensure_properties(run, Tag::RunProps);
            let bold = doc.upsert_property(rpr, "b");
            doc.set_w_attr(bold, "val", "true");
            let color = doc.upsert_property(rpr, "color");
            doc.set_w_attr(color, "val", color_hex);
            formatted += 1;
        }
    }

    debug!("选项标签上色: {} 个", formatted);
    Ok(formatted)
}
