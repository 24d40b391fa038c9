//! 加粗文字上色 - 业务能力层

use crate::infrastructure::{Tag, XmlDocument};
use indextree::NodeId;
use tracing::debug;

/// 给全文所有加粗的文字块设置颜色，返回上色的文字块数
pub fn color_bold_runs(doc: &mut XmlDocument, color_hex: &str) -> usize {
    let runs = doc.elements_with_tag(doc.root(), Tag::Run);
    let mut colored = 0;

    for run in runs {
        let Some(rpr) = doc.first_child_with_tag(run, Tag::RunProps) else {
            continue;
        };
        if !is_bold(doc, rpr) {
            continue;
        }

        let color = doc.upsert_property(rpr, "color");
        doc.set_w_attr(color, "val", color_hex);
        colored += 1;
    }

    debug!("加粗文字上色: {} 个文字块", colored);
    colored
}

/// `w:b` 存在且没有显式关闭（`false` / `0` / `off`）
fn is_bold(doc: &XmlDocument, rpr: NodeId) -> bool {
    let Some(bold) = doc.w_child(rpr, "b") else {
        return false;
    };
    !matches!(
        doc.w_attr(bold, "val").map(str::to_ascii_lowercase).as_deref(),
        Some("false") | Some("0") | Some("off")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::xml_tree::tests::wrap_body;

    fn color_of(doc: &XmlDocument, run: NodeId) -> Option<String> {
        let rpr = doc.first_child_with_tag(run, Tag::RunProps)?;
        let color = doc.w_child(rpr, "color")?;
        doc.w_attr(color, "val").map(str::to_string)
    }

    #[test]
    fn test_bold_values() {
        let mut doc = XmlDocument::parse(&wrap_body(concat!(
            "<w:p>",
            "<w:r><w:rPr><w:b/></w:rPr><w:t>a</w:t></w:r>",
            "<w:r><w:rPr><w:b w:val=\"1\"/></w:rPr><w:t>b</w:t></w:r>",
            "<w:r><w:rPr><w:b w:val=\"on\"/></w:rPr><w:t>c</w:t></w:r>",
            "<w:r><w:rPr><w:b w:val=\"0\"/></w:rPr><w:t>d</w:t></w:r>",
            "<w:r><w:rPr><w:b w:val=\"false\"/></w:rPr><w:t>e</w:t></w:r>",
            "<w:r><w:rPr><w:i/></w:rPr><w:t>f</w:t></w:r>",
            "<w:r><w:t>g</w:t></w:r>",
            "</w:p>",
        )))
        .unwrap();

        assert_eq!(color_bold_runs(&mut doc, "FF0000"), 3);

        let body = doc.body().unwrap();
        let colors: Vec<Option<String>> = doc
            .elements_with_tag(body, Tag::Run)
            .into_iter()
            .map(|run| color_of(&doc, run))
            .collect();
        let red = Some("FF0000".to_string());
        assert_eq!(
            colors,
            vec![red.clone(), red.clone(), red, None, None, None, None]
        );
    }

    #[test]
    fn test_overwrites_existing_color() {
        let mut doc = XmlDocument::parse(&wrap_body(
            "<w:p><w:r><w:rPr><w:b/><w:color w:val=\"00FF00\"/></w:rPr><w:t>x</w:t></w:r></w:p>",
        ))
        .unwrap();

        color_bold_runs(&mut doc, "C00000");

        let body = doc.body().unwrap();
        let run = doc.elements_with_tag(body, Tag::Run)[0];
        assert_eq!(color_of(&doc, run).as_deref(), Some("C00000"));
    }
}
