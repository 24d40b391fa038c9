//! 选项拆分 - 业务能力层
//!
//! 把"A.\t甲\tB.\t乙"这种同一段落里用 Tab 排开的选项拆成独立段落。
//!
//! 每个 Tab 有两种含义：
//! - 选项之间的分隔：Tab 后面紧跟下一个选项标签 → 在 Tab 处拆段
//! - 标签与答案之间的分隔：Tab 前面刚好是 "A." → 换成一个空格
//!
//! 判断依据是 Tab 后面的一小段预读文本，长度上限见 [`LOOKAHEAD_LIMIT`]。

use crate::error::AppResult;
use crate::infrastructure::{Tag, XmlDocument};
use crate::services::patterns::{
    is_blank_char, OPTION_LABEL_AT_END, OPTION_MARKER_ANYWHERE, OPTION_MARKER_AT_START,
};
use indextree::NodeId;
use tracing::debug;

/// 预读文本超过这么多字符后就不再向后面的文字块继续读取
pub const LOOKAHEAD_LIMIT: usize = 10;

/// 拆分统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitStats {
    /// 新建的段落数
    pub paragraphs_created: usize,
    /// 被替换成空格的标签 Tab 数
    pub label_tabs_replaced: usize,
}

/// 处理 body 下所有含选项标签的直接子段落
pub fn split_options(doc: &mut XmlDocument) -> AppResult<SplitStats> {
    let body = doc.body()?;
    let mut stats = SplitStats::default();

    let paragraphs: Vec<NodeId> = doc
        .child_elements(body)
        .into_iter()
        .filter(|&id| doc.tag(id) == Tag::Paragraph)
        .collect();

    for paragraph in paragraphs {
        if !OPTION_MARKER_ANYWHERE.is_match(&doc.visible_text(paragraph)) {
            continue;
        }

        // 拆出来的后半段可能还含有更多选项，放进待处理栈继续拆
        let mut pending = vec![paragraph];
        while let Some(current) = pending.pop() {
            if let Some(remainder) = process_paragraph(doc, current, &mut stats) {
                stats.paragraphs_created += 1;
                pending.push(remainder);
            }
        }
    }

    debug!(
        "选项拆分: 新建 {} 个段落, 替换 {} 个标签 Tab",
        stats.paragraphs_created, stats.label_tabs_replaced
    );
    Ok(stats)
}

/// 扫描一个段落；发生拆分时返回新段落
fn process_paragraph(
    doc: &mut XmlDocument,
    paragraph: NodeId,
    stats: &mut SplitStats,
) -> Option<NodeId> {
    let runs = paragraph_runs(doc, paragraph);
    let mut text_so_far = String::new();

    for (run_index, &run) in runs.iter().enumerate() {
        let nodes = doc.child_elements(run);

        for (node_index, &node) in nodes.iter().enumerate() {
            match doc.tag(node) {
                Tag::Text => text_so_far.push_str(&doc.own_text(node)),
                Tag::Tab => {
                    let look_ahead =
                        look_ahead_text(doc, &nodes[node_index + 1..], &runs[run_index + 1..]);

                    if OPTION_MARKER_AT_START.is_match(&look_ahead) {
                        return Some(split_paragraph_at(doc, paragraph, run, node));
                    }

                    if OPTION_LABEL_AT_END.is_match(&text_so_far) {
                        // 后面本来就有空白时只删掉 Tab，避免出现两个空格
                        let next_is_blank = look_ahead.chars().next().is_some_and(is_blank_char);
                        let replacement = if next_is_blank { "" } else { " " };
                        let text_node = doc.new_text_element(replacement, !next_is_blank);
                        doc.replace(node, text_node);
                        text_so_far.push_str(replacement);
                        stats.label_tabs_replaced += 1;
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// 段落中的全部文字块（按文档顺序）
///
/// 包括超链接、修订（`w:ins`）、智能标记等包装元素里的文字块，
/// 但不包括文本框里嵌套段落的文字块
fn paragraph_runs(doc: &XmlDocument, paragraph: NodeId) -> Vec<NodeId> {
    doc.elements_with_tag(paragraph, Tag::Run)
        .into_iter()
        .filter(|&run| doc.enclosing(run, Tag::Paragraph) == Some(paragraph))
        .collect()
}

/// Tab 之后的预读文本
///
/// 先取当前文字块中 Tab 之后的全部文本；不足 [`LOOKAHEAD_LIMIT`] 时再逐个拼接后续文字块
fn look_ahead_text(doc: &XmlDocument, rest_of_run: &[NodeId], next_runs: &[NodeId]) -> String {
    let mut text: String = rest_of_run
        .iter()
        .filter(|&&id| doc.tag(id) == Tag::Text)
        .map(|&id| doc.own_text(id))
        .collect();

    for &run in next_runs {
        if text.chars().count() > LOOKAHEAD_LIMIT {
            break;
        }
        for node in doc.child_elements(run) {
            if doc.tag(node) == Tag::Text {
                text.push_str(&doc.own_text(node));
            }
        }
    }

    text
}

/// 在 `tab` 处把段落一分为二，返回新段落
///
/// - 新段落复制原段落的属性（`w:pPr`），去掉 `w14:paraId` / `w14:textId`
/// - 当前文字块中 Tab 之后的节点移入新文字块（复制 `w:rPr` 以保留格式）
/// - 当前文字块之后的所有兄弟节点整体移入新段落
/// - 文字块在包装元素（超链接、修订等）里时，包装元素同样一分为二，
///   后半部分连同包装元素之后的兄弟节点一起移走
/// - Tab 本身被删除
fn split_paragraph_at(doc: &mut XmlDocument, paragraph: NodeId, run: NodeId, tab: NodeId) -> NodeId {
    let new_paragraph = doc.shallow_clone(paragraph);
    doc.remove_attrs(new_paragraph, |name| {
        matches!(
            name.rsplit(':').next(),
            Some("paraId") | Some("textId")
        )
    });
    if let Some(ppr) = doc.first_child_with_tag(paragraph, Tag::ParagraphProps) {
        let ppr_copy = doc.deep_clone(ppr);
        doc.append(new_paragraph, ppr_copy);
    }

    let tail = doc.following_siblings(tab);
    let mut carried = if tail.is_empty() {
        None
    } else {
        let new_run = doc.shallow_clone(run);
        if let Some(rpr) = doc.first_child_with_tag(run, Tag::RunProps) {
            let rpr_copy = doc.deep_clone(rpr);
            doc.append(new_run, rpr_copy);
        }
        for node in tail {
            doc.append(new_run, node);
        }
        Some(new_run)
    };

    // 从文字块逐层向上走到段落，每一层把后面的兄弟节点带走
    let mut current = run;
    while let Some(container) = doc.parent(current) {
        let moved: Vec<NodeId> = carried.into_iter().chain(doc.following_siblings(current)).collect();

        if container == paragraph {
            for node in moved {
                doc.append(new_paragraph, node);
            }
            break;
        }

        carried = if moved.is_empty() {
            None
        } else {
            let wrapper = doc.shallow_clone(container);
            // 修订标记的 w:id 必须唯一
            doc.remove_w_attr(wrapper, "id");
            for node in moved {
                doc.append(wrapper, node);
            }
            Some(wrapper)
        };
        current = container;
    }

    doc.detach(tab);
    doc.insert_after(paragraph, new_paragraph);
    new_paragraph
}
