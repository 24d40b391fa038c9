//! 多余空格清理 - 业务能力层

use crate::infrastructure::{Tag, XmlDocument};
use crate::services::patterns::REPEATED_SPACES;
use tracing::debug;

/// 把每个 `w:t` 中连续两个以上的空白 / 不可见空格合并成一个普通空格
///
/// 被修改的节点加上 `xml:space="preserve"`，避免 Word 再把这个空格吞掉。
/// 返回被修改的文本节点数。
pub fn collapse_spaces(doc: &mut XmlDocument) -> usize {
    let text_nodes = doc.elements_with_tag(doc.root(), Tag::Text);
    let mut changed = 0;

    for node in text_nodes {
        let original = doc.own_text(node);
        if !REPEATED_SPACES.is_match(&original) {
            continue;
        }

        let collapsed = REPEATED_SPACES.replace_all(&original, " ");
        doc.set_own_text(node, &collapsed);
        doc.set_attr(node, "xml:space", "preserve");
        changed += 1;
    }

    debug!("合并空格: 修改 {} 个文本节点", changed);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xml_tree::tests::{paragraph_texts, wrap_body};

    #[test]
    fn test_collapse_mixed_spaces() {
        let mut doc = XmlDocument::parse(&wrap_body(
            "<w:p><w:r><w:t>a  b\u{00A0}\u{00A0}c \u{2003}\u{200B}d e</w:t></w:r></w:p>",
        ))
        .unwrap();

        assert_eq!(collapse_spaces(&mut doc), 1);
        assert_eq!(paragraph_texts(&doc), vec!["a b c d e"]);

        let body = doc.body().unwrap();
        let t = doc.elements_with_tag(body, Tag::Text)[0];
        assert_eq!(doc.attr(t, "xml:space"), Some("preserve"));
    }

    #[test]
    fn test_single_spaces_untouched() {
        let mut doc =
            XmlDocument::parse(&wrap_body("<w:p><w:r><w:t>a b\u{00A0}c</w:t></w:r></w:p>")).unwrap();

        assert_eq!(collapse_spaces(&mut doc), 0);
        let body = doc.body().unwrap();
        let t = doc.elements_with_tag(body, Tag::Text)[0];
        assert_eq!(doc.attr(t, "xml:space"), None);
        assert_eq!(paragraph_texts(&doc), vec!["a b\u{00A0}c"]);
    }

    #[test]
    fn test_idempotent() {
        let mut doc = XmlDocument::parse(&wrap_body(
            "<w:p><w:r><w:t>Câu 1:    Cho   hàm\u{2002}\u{2002}số</w:t></w:r></w:p>",
        ))
        .unwrap();

        collapse_spaces(&mut doc);
        let once = doc.to_xml().unwrap();
        assert_eq!(collapse_spaces(&mut doc), 0);
        assert_eq!(doc.to_xml().unwrap(), once);
    }
}
