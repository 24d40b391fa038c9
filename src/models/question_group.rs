use indextree::NodeId;

/// 一道题对应的正文元素
///
/// 从"Câu N:"所在段落开始，到下一个题号或"HẾT"之前为止。
/// `elements` 里的节点之后可能被删空行阶段摘掉，使用前需要重新确认是否仍在文档中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGroup {
    /// 发现顺序（从 0 开始）
    pub index: usize,
    pub elements: Vec<NodeId>,
}

impl QuestionGroup {
    pub fn new(index: usize, first: NodeId) -> Self {
        Self {
            index,
            elements: vec![first],
        }
    }
}
