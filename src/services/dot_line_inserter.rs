//! 点线行插入 - 业务能力层
//!
//! 在每道题最后一个仍然存在的元素后面插入若干行点线，供学生手写作答

use crate::infrastructure::XmlDocument;
use crate::models::QuestionGroup;
use indextree::NodeId;
use tracing::debug;

/// 点线行的固定内容（150 个点）
pub const DOT_LINE: &str = "......................................................................................................................................................";

/// 为每组插入 `count` 行点线，返回插入的段落总数
///
/// 分组中的元素可能已被删空行阶段摘掉：从后往前找最后一个仍在文档中的元素，
/// 找不到就跳过这一组
pub fn insert_dot_lines(doc: &mut XmlDocument, groups: &[QuestionGroup], count: u32) -> usize {
    if count == 0 {
        return 0;
    }

    let mut inserted = 0;
    for group in groups {
        let Some(mut anchor) = last_attached(doc, group) else {
            debug!("第 {} 组的元素已全部被删除，跳过", group.index);
            continue;
        };

        for _ in 0..count {
            let line = new_dot_paragraph(doc);
            doc.insert_after(anchor, line);
            anchor = line;
            inserted += 1;
        }
    }

    debug!("插入点线: {} 行", inserted);
    inserted
}

fn last_attached(doc: &XmlDocument, group: &QuestionGroup) -> Option<NodeId> {
    group
        .elements
        .iter()
        .rev()
        .copied()
        .find(|&id| doc.is_attached(id))
}

fn new_dot_paragraph(doc: &mut XmlDocument) -> NodeId {
    let paragraph = doc.new_w_element("p");
    let run = doc.new_w_element("r");
    let text = doc.new_text_element(DOT_LINE, false);
    doc.append(run, text);
    doc.append(paragraph, run);
    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xml_tree::tests::{paragraph_texts, wrap_body};
    use crate::infrastructure::Tag;
    use crate::services::question_scanner::scan_questions;

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
    }

    #[test]
    fn test_dot_line_is_150_dots() {
        assert_eq!(DOT_LINE.len(), 150);
        assert!(DOT_LINE.chars().all(|c| c == '.'));
    }

    #[test]
    fn test_three_lines_after_each_of_two_groups() {
        let body = format!(
            "{}{}{}{}{}<w:sectPr/>",
            para("Câu 1:"),
            para("A. x"),
            para("Câu 2:"),
            para("B. y"),
            para("HẾT"),
        );
        let mut doc = XmlDocument::parse(&wrap_body(&body)).unwrap();
        let groups = scan_questions(&doc).unwrap();

        assert_eq!(insert_dot_lines(&mut doc, &groups, 3), 6);

        let d = DOT_LINE.to_string();
        assert_eq!(
            paragraph_texts(&doc),
            vec![
                "Câu 1:".to_string(),
                "A. x".to_string(),
                d.clone(),
                d.clone(),
                d.clone(),
                "Câu 2:".to_string(),
                "B. y".to_string(),
                d.clone(),
                d.clone(),
                d,
                "HẾT".to_string(),
            ]
        );

        // 节属性仍是 body 的最后一个元素
        let body = doc.body().unwrap();
        let last = *doc.child_elements(body).last().unwrap();
        assert_eq!(doc.tag(last), Tag::SectionProps);
    }

    #[test]
    fn test_falls_back_to_last_attached_element() {
        let body = format!("{}{}{}", para("Câu 1:"), para("A. x"), para(""));
        let mut doc = XmlDocument::parse(&wrap_body(&body)).unwrap();
        let groups = scan_questions(&doc).unwrap();
        assert_eq!(groups[0].elements.len(), 3);

        doc.detach(groups[0].elements[2]);
        insert_dot_lines(&mut doc, &groups, 1);

        assert_eq!(
            paragraph_texts(&doc),
            vec!["Câu 1:".to_string(), "A. x".to_string(), DOT_LINE.to_string()]
        );
    }

    #[test]
    fn test_group_with_nothing_attached_is_skipped() {
        let body = format!("{}{}", para("Câu 1:"), para("Câu 2:"));
        let mut doc = XmlDocument::parse(&wrap_body(&body)).unwrap();
        let groups = scan_questions(&doc).unwrap();

        doc.detach(groups[0].elements[0]);

        assert_eq!(insert_dot_lines(&mut doc, &groups, 2), 2);
        assert_eq!(
            paragraph_texts(&doc),
            vec!["Câu 2:".to_string(), DOT_LINE.to_string(), DOT_LINE.to_string()]
        );
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut doc = XmlDocument::parse(&wrap_body(&para("Câu 1:"))).unwrap();
        let groups = scan_questions(&doc).unwrap();
        assert_eq!(insert_dot_lines(&mut doc, &groups, 0), 0);
        assert_eq!(paragraph_texts(&doc).len(), 1);
    }
}
