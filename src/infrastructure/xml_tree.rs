//! XML 文档树 - 基础设施层
//!
//! 持有整棵 `document.xml` 树，只暴露"查询 / 修改节点"的能力。
//!
//! 节点全部放在 `indextree` arena 中，`NodeId` 在整个处理过程中稳定不变：
//! 被删除（detach）的段落仍然留在 arena 里，只是不再挂在根节点之下，
//! 所以"是否仍在文档中"通过沿祖先链向上查找根节点来判断。

use crate::error::{AppError, AppResult, XmlError};
use indextree::{Arena, NodeId};
use phf::phf_map;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::trace;

/// WordprocessingML 主命名空间
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// VML 命名空间（旧式图形 v:shape）
pub const VML_NS: &str = "urn:schemas-microsoft-com:vml";
/// Office Math (OMML) 命名空间
pub const MATH_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";

/// 元素种类
///
/// 命名空间在解析阶段就已解析完毕，之后所有判断都只比较 `Tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Body,
    Paragraph,
    ParagraphProps,
    Run,
    RunProps,
    Text,
    Tab,
    Break,
    Drawing,
    Picture,
    Object,
    Shape,
    Table,
    TableCell,
    TextBoxContent,
    SectionProps,
    /// `w:sym` 符号字符
    Symbol,
    /// `m:oMath` / `m:oMathPara` 公式
    Math,
    Other,
}

static W_TAGS: phf::Map<&'static str, Tag> = phf_map! {
    "body" => Tag::Body,
    "p" => Tag::Paragraph,
    "pPr" => Tag::ParagraphProps,
    "r" => Tag::Run,
    "rPr" => Tag::RunProps,
    "t" => Tag::Text,
    "tab" => Tag::Tab,
    "br" => Tag::Break,
    "drawing" => Tag::Drawing,
    "pict" => Tag::Picture,
    "object" => Tag::Object,
    "tbl" => Tag::Table,
    "tc" => Tag::TableCell,
    "txbxContent" => Tag::TextBoxContent,
    "sectPr" => Tag::SectionProps,
    "sym" => Tag::Symbol,
};

/// w:rPr 子元素的 schema 顺序
const RUN_PROPERTY_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike",
    "outline", "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden",
    "color", "spacing", "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr",
    "shd", "fitText", "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish",
    "oMath", "rPrChange",
];

/// w:pPr 子元素的 schema 顺序
const PARAGRAPH_PROPERTY_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle", "rPr",
    "sectPr", "pPrChange",
];

/// 元素节点数据
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// 带前缀的限定名，例如 `w:p`
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub tag: Tag,
    /// 元素是否属于 WordprocessingML 命名空间（与前缀无关）
    pub in_w_ns: bool,
}

impl XmlElement {
    /// 去掉前缀后的本地名
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }
}

/// 树中的节点
#[derive(Debug, Clone)]
pub enum XmlNode {
    Document,
    Declaration,
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// 解析后的 `document.xml`
#[derive(Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNode>,
    root: NodeId,
    /// 新建元素/属性使用的前缀，保证在根元素上已绑定到 WordprocessingML
    w_prefix: String,
    /// 文档中所有绑定到 WordprocessingML 的非空前缀，用于匹配已有属性
    w_attr_prefixes: Vec<String>,
}

impl XmlDocument {
    /// 解析 XML 文本
    pub fn parse(xml: &str) -> AppResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut arena = Arena::new();
        let root = arena.new_node(XmlNode::Document);
        let mut stack = vec![root];
        let mut scopes = NamespaceScopes::default();

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| AppError::xml_parse(position, e.to_string()))?;
            let parent = *stack.last().unwrap_or(&root);

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = utf8(e.name().as_ref(), position)?.to_string();

                    let mut attributes = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr.map_err(|err| AppError::xml_parse(position, err.to_string()))?;
                        let key = utf8(attr.key.as_ref(), position)?.to_string();
                        let value = attr
                            .unescape_value()
                            .map_err(|err| AppError::xml_parse(position, err.to_string()))?
                            .into_owned();
                        attributes.push((key, value));
                    }

                    scopes.enter(&attributes);
                    let (tag, in_w_ns) = scopes.classify(&name);
                    if is_empty {
                        scopes.leave();
                    }

                    let id = arena.new_node(XmlNode::Element(XmlElement {
                        name,
                        attributes,
                        tag,
                        in_w_ns,
                    }));
                    parent.append(id, &mut arena);
                    if !is_empty {
                        stack.push(id);
                    }
                }
                Event::End(_) => {
                    if stack.len() <= 1 {
                        return Err(AppError::xml_parse(position, "多余的结束标签"));
                    }
                    stack.pop();
                    scopes.leave();
                }
                Event::Text(ref e) => {
                    let text = utf8(e, position)?;
                    append_text(&mut arena, parent, text);
                }
                Event::GeneralRef(ref e) => {
                    let resolved = match e
                        .resolve_char_ref()
                        .map_err(|err| AppError::xml_parse(position, err.to_string()))?
                    {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = utf8(e, position)?;
                            quick_xml::escape::resolve_predefined_entity(name)
                                .ok_or_else(|| {
                                    AppError::xml_parse(position, format!("未知实体: &{};", name))
                                })?
                                .to_string()
                        }
                    };
                    append_text(&mut arena, parent, &resolved);
                }
                Event::CData(ref e) => {
                    let text = utf8(e, position)?.to_string();
                    let id = arena.new_node(XmlNode::CData(text));
                    parent.append(id, &mut arena);
                }
                Event::Comment(ref e) => {
                    let text = utf8(e, position)?.to_string();
                    let id = arena.new_node(XmlNode::Comment(text));
                    parent.append(id, &mut arena);
                }
                Event::Decl(_) => {
                    let id = arena.new_node(XmlNode::Declaration);
                    parent.append(id, &mut arena);
                }
                Event::Eof => break,
                other => {
                    trace!("忽略 XML 事件: {:?}", other);
                }
            }
        }

        if stack.len() > 1 {
            return Err(AppError::xml_parse(
                xml.len() as u64,
                "文档在元素闭合之前结束",
            ));
        }

        let w_prefix = bind_w_prefix(&mut arena, root, &scopes.declared);
        let mut w_attr_prefixes: Vec<String> = scopes
            .declared
            .iter()
            .filter(|(prefix, uri)| uri == W_NS && !prefix.is_empty())
            .map(|(prefix, _)| prefix.clone())
            .collect();
        w_attr_prefixes.push(w_prefix.clone());
        w_attr_prefixes.dedup();

        Ok(Self {
            arena,
            root,
            w_prefix,
            w_attr_prefixes,
        })
    }

    /// 序列化为 XML 文本
    pub fn to_xml(&self) -> AppResult<String> {
        let mut writer = Writer::new(Vec::new());
        for child in self.root.children(&self.arena) {
            self.write_node(&mut writer, child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| AppError::xml_serialize(e.to_string()))
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> AppResult<()> {
        let event = match self.arena[id].get() {
            XmlNode::Document => return Ok(()),
            XmlNode::Declaration => Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
            XmlNode::Text(text) => Event::Text(BytesText::new(text)),
            XmlNode::CData(text) => Event::CData(BytesCData::new(text.as_str())),
            XmlNode::Comment(text) => Event::Comment(BytesText::from_escaped(text.as_str())),
            XmlNode::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (key, value) in &element.attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                if id.children(&self.arena).next().is_none() {
                    Event::Empty(start)
                } else {
                    write_event(writer, Event::Start(start))?;
                    for child in id.children(&self.arena) {
                        self.write_node(writer, child)?;
                    }
                    Event::End(BytesEnd::new(element.name.as_str()))
                }
            }
        };
        write_event(writer, event)
    }

    // ========== 查询 ==========

    /// 文档根节点（不是 `w:document`，而是它的上一层）
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// `w:body` 元素
    pub fn body(&self) -> AppResult<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|&id| self.tag(id) == Tag::Body)
            .ok_or(AppError::Xml(XmlError::MissingBody))
    }

    pub fn element(&self, id: NodeId) -> Option<&XmlElement> {
        match self.arena.get(id)?.get() {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut XmlElement> {
        match self.arena.get_mut(id)?.get_mut() {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// 元素种类；非元素节点返回 `Tag::Other`
    pub fn tag(&self, id: NodeId) -> Tag {
        self.element(id).map_or(Tag::Other, |e| e.tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    /// 直接子元素（忽略文本、注释等）
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena)
            .filter(|&child| self.element(child).is_some())
            .collect()
    }

    /// 第一个指定种类的直接子元素
    pub fn first_child_with_tag(&self, id: NodeId, tag: Tag) -> Option<NodeId> {
        id.children(&self.arena).find(|&child| self.tag(child) == tag)
    }

    /// 按文档顺序列出 `scope` 之下（含自身）所有指定种类的元素
    pub fn elements_with_tag(&self, scope: NodeId, tag: Tag) -> Vec<NodeId> {
        scope
            .descendants(&self.arena)
            .filter(|&id| self.tag(id) == tag)
            .collect()
    }

    /// `scope` 的后代中是否有指定种类的元素
    pub fn contains_tag(&self, scope: NodeId, tag: Tag) -> bool {
        scope
            .descendants(&self.arena)
            .skip(1)
            .any(|id| self.tag(id) == tag)
    }

    /// 紧随其后的兄弟节点（不含自身）
    pub fn following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        id.following_siblings(&self.arena).skip(1).collect()
    }

    /// 可见文本：`scope` 之下所有 `w:t` 的内容按顺序拼接
    pub fn visible_text(&self, scope: NodeId) -> String {
        let mut text = String::new();
        for id in scope.descendants(&self.arena) {
            if self.tag(id) == Tag::Text {
                self.push_own_text(id, &mut text);
            }
        }
        text
    }

    /// 单个 `w:t` 节点自己的文本
    pub fn own_text(&self, text_node: NodeId) -> String {
        let mut text = String::new();
        self.push_own_text(text_node, &mut text);
        text
    }

    fn push_own_text(&self, id: NodeId, out: &mut String) {
        for child in id.children(&self.arena) {
            match self.arena[child].get() {
                XmlNode::Text(s) | XmlNode::CData(s) => out.push_str(s),
                _ => {}
            }
        }
    }

    /// 节点是否仍挂在文档树上
    pub fn is_attached(&self, id: NodeId) -> bool {
        !id.is_removed(&self.arena) && id.ancestors(&self.arena).any(|a| a == self.root)
    }

    /// 按限定名读取属性
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 读取 WordprocessingML 命名空间下的属性，例如 `w:val`
    pub fn w_attr(&self, id: NodeId, local: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(key, _)| self.is_w_attr(key, local))
            .map(|(_, value)| value.as_str())
    }

    /// 本地名为 `local` 的 WordprocessingML 直接子元素
    pub fn w_child(&self, id: NodeId, local: &str) -> Option<NodeId> {
        id.children(&self.arena).find(|&child| {
            self.element(child)
                .is_some_and(|e| e.in_w_ns && e.local_name() == local)
        })
    }

    /// 最近的指定种类祖先（不含自身）
    pub fn enclosing(&self, id: NodeId, tag: Tag) -> Option<NodeId> {
        id.ancestors(&self.arena)
            .skip(1)
            .find(|&ancestor| self.tag(ancestor) == tag)
    }

    fn is_w_attr(&self, key: &str, local: &str) -> bool {
        key.split_once(':').is_some_and(|(prefix, name)| {
            name == local && self.w_attr_prefixes.iter().any(|p| p == prefix)
        })
    }

    fn w_name(&self, local: &str) -> String {
        format!("{}:{}", self.w_prefix, local)
    }

    // ========== 修改 ==========

    /// 设置（或覆盖）属性
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            match element.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => element.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn set_w_attr(&mut self, id: NodeId, local: &str, value: &str) {
        let existing = self.element(id).and_then(|element| {
            element
                .attributes
                .iter()
                .find(|(key, _)| self.is_w_attr(key, local))
                .map(|(key, _)| key.clone())
        });
        let name = existing.unwrap_or_else(|| self.w_name(local));
        self.set_attr(id, &name, value);
    }

    /// 删除满足条件的属性
    pub fn remove_attrs(&mut self, id: NodeId, mut predicate: impl FnMut(&str) -> bool) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.retain(|(key, _)| !predicate(key));
        }
    }

    /// 删除 WordprocessingML 命名空间下的属性
    pub fn remove_w_attr(&mut self, id: NodeId, local: &str) {
        let prefixes = self.w_attr_prefixes.clone();
        self.remove_attrs(id, |key| {
            key.split_once(':')
                .is_some_and(|(prefix, name)| name == local && prefixes.iter().any(|p| p == prefix))
        });
    }

    /// 新建一个 WordprocessingML 元素（未挂到树上）
    pub fn new_w_element(&mut self, local: &str) -> NodeId {
        let tag = W_TAGS.get(local).copied().unwrap_or(Tag::Other);
        let name = self.w_name(local);
        self.arena.new_node(XmlNode::Element(XmlElement {
            name,
            attributes: Vec::new(),
            tag,
            in_w_ns: true,
        }))
    }

    /// 新建 `w:t`，`preserve` 为真时带上 `xml:space="preserve"`
    pub fn new_text_element(&mut self, text: &str, preserve: bool) -> NodeId {
        let t = self.new_w_element("t");
        if preserve {
            self.set_attr(t, "xml:space", "preserve");
        }
        if !text.is_empty() {
            let content = self.arena.new_node(XmlNode::Text(text.to_string()));
            t.append(content, &mut self.arena);
        }
        t
    }

    /// 替换 `w:t` 的文本内容
    pub fn set_own_text(&mut self, text_node: NodeId, text: &str) {
        let children: Vec<NodeId> = text_node.children(&self.arena).collect();
        for child in children {
            child.detach(&mut self.arena);
        }
        if !text.is_empty() {
            let content = self.arena.new_node(XmlNode::Text(text.to_string()));
            text_node.append(content, &mut self.arena);
        }
    }

    /// 复制元素本身（不含子节点）
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let data = self.arena[id].get().clone();
        self.arena.new_node(data)
    }

    /// 递归复制整棵子树
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            let child_copy = self.deep_clone(child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        anchor.insert_after(node, &mut self.arena);
    }

    /// 用 `replacement` 替换 `old`
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) {
        old.insert_before(replacement, &mut self.arena);
        old.detach(&mut self.arena);
    }

    /// 从树上摘下节点（节点仍留在 arena 中）
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// 确保段落/文字块有属性元素（`w:pPr` / `w:rPr`），并返回它
    pub fn ensure_properties(&mut self, owner: NodeId, tag: Tag) -> NodeId {
        if let Some(existing) = self.first_child_with_tag(owner, tag) {
            return existing;
        }
        let local = match tag {
            Tag::ParagraphProps => "pPr",
            _ => "rPr",
        };
        let props = self.new_w_element(local);
        owner.prepend(props, &mut self.arena);
        props
    }

    /// 取得或按 schema 顺序插入属性子元素，例如 `w:rPr/w:b`
    pub fn upsert_property(&mut self, props: NodeId, local: &str) -> NodeId {
        if let Some(existing) = self.w_child(props, local) {
            return existing;
        }

        let order = match self.tag(props) {
            Tag::RunProps => RUN_PROPERTY_ORDER,
            Tag::ParagraphProps => PARAGRAPH_PROPERTY_ORDER,
            _ => &[],
        };
        let rank_of = |name: &str| order.iter().position(|n| *n == name);

        let property = self.new_w_element(local);
        let next = rank_of(local).and_then(|rank| {
            props.children(&self.arena).find(|&child| {
                self.element(child)
                    .and_then(|e| rank_of(e.local_name()))
                    .is_some_and(|child_rank| child_rank > rank)
            })
        });
        match next {
            Some(next) => next.insert_before(property, &mut self.arena),
            None => props.append(property, &mut self.arena),
        }
        property
    }
}

/// 命名空间作用域栈
#[derive(Default)]
struct NamespaceScopes {
    bindings: Vec<(String, String)>,
    frames: Vec<usize>,
    /// 文档中出现过的全部声明
    declared: Vec<(String, String)>,
}

impl NamespaceScopes {
    fn enter(&mut self, attributes: &[(String, String)]) {
        let mut count = 0;
        for (key, value) in attributes {
            let prefix = if key == "xmlns" {
                Some("")
            } else {
                key.strip_prefix("xmlns:")
            };
            if let Some(prefix) = prefix {
                self.bindings.push((prefix.to_string(), value.clone()));
                self.declared.push((prefix.to_string(), value.clone()));
                count += 1;
            }
        }
        self.frames.push(count);
    }

    fn leave(&mut self) {
        let count = self.frames.pop().unwrap_or(0);
        let keep = self.bindings.len().saturating_sub(count);
        self.bindings.truncate(keep);
    }

    fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// 返回元素种类，以及它是否属于 WordprocessingML 命名空间
    fn classify(&self, qualified: &str) -> (Tag, bool) {
        let (prefix, local) = qualified.split_once(':').unwrap_or(("", qualified));
        match self.resolve(prefix) {
            Some(W_NS) => (W_TAGS.get(local).copied().unwrap_or(Tag::Other), true),
            Some(VML_NS) if local == "shape" => (Tag::Shape, false),
            Some(MATH_NS) if local == "oMath" || local == "oMathPara" => (Tag::Math, false),
            _ => (Tag::Other, false),
        }
    }
}

/// 选出新建元素使用的 WordprocessingML 前缀
///
/// 优先使用根元素上已声明、且文档中没有被重新绑定到别处的前缀；
/// 否则（例如整份文档用默认命名空间）在根元素上补一个新的 `xmlns:w` 声明。
fn bind_w_prefix(
    arena: &mut Arena<XmlNode>,
    root: NodeId,
    declared: &[(String, String)],
) -> String {
    let document_element = root
        .children(arena)
        .find(|&id| matches!(arena[id].get(), XmlNode::Element(_)));
    let Some(document_element) = document_element else {
        return "w".to_string();
    };
    let Some(XmlNode::Element(element)) = arena.get_mut(document_element).map(|n| n.get_mut())
    else {
        return "w".to_string();
    };

    let rebound = |prefix: &str| declared.iter().any(|(p, uri)| p == prefix && uri != W_NS);
    let bound_on_root = element.attributes.iter().find_map(|(key, value)| {
        key.strip_prefix("xmlns:")
            .filter(|prefix| value == W_NS && !rebound(prefix))
            .map(str::to_string)
    });
    if let Some(prefix) = bound_on_root {
        return prefix;
    }

    let fresh = std::iter::once("w".to_string())
        .chain((0..).map(|i| format!("w{}", i)))
        .find(|candidate| !declared.iter().any(|(p, _)| p == candidate))
        .unwrap_or_else(|| "w".to_string());
    element
        .attributes
        .push((format!("xmlns:{}", fresh), W_NS.to_string()));
    fresh
}

fn utf8(bytes: &[u8], position: u64) -> AppResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| AppError::xml_parse(position, e.to_string()))
}

fn append_text(arena: &mut Arena<XmlNode>, parent: NodeId, text: &str) {
    if let Some(last) = parent.children(arena).last() {
        if let XmlNode::Text(existing) = arena[last].get_mut() {
            existing.push_str(text);
            return;
        }
    }
    let id = arena.new_node(XmlNode::Text(text.to_string()));
    parent.append(id, arena);
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> AppResult<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::xml_serialize(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 用最小的 document.xml 外壳包住 body 内容
    pub(crate) fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}" xmlns:v="{}" xmlns:m="{}"><w:body>{}</w:body></w:document>"#,
            W_NS, VML_NS, MATH_NS, body
        )
    }

    /// body 下所有直接子段落的可见文本
    pub(crate) fn paragraph_texts(doc: &XmlDocument) -> Vec<String> {
        let body = doc.body().unwrap();
        doc.child_elements(body)
            .into_iter()
            .filter(|&id| doc.tag(id) == Tag::Paragraph)
            .map(|p| doc.visible_text(p))
            .collect()
    }

    #[test]
    fn test_parse_classifies_by_namespace_not_prefix() {
        let xml = format!(
            r#"<x:document xmlns:x="{}" xmlns:w="urn:other"><x:body><x:p><w:r/><x:r><x:t>hi</x:t></x:r></x:p></x:body></x:document>"#,
            W_NS
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        let body = doc.body().unwrap();
        let runs = doc.elements_with_tag(body, Tag::Run);

        // w:r 绑定在别的命名空间上，不算 run
        assert_eq!(runs.len(), 1);
        assert_eq!(doc.visible_text(body), "hi");
    }

    #[test]
    fn test_entities_round_trip() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>a &amp; b &lt; c &#x41;</w:t></w:r></w:p>"#);
        let doc = XmlDocument::parse(&xml).unwrap();
        let body = doc.body().unwrap();
        assert_eq!(doc.visible_text(body), "a & b < c A");

        let again = XmlDocument::parse(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(again.visible_text(again.body().unwrap()), "a & b < c A");
    }

    #[test]
    fn test_serialize_keeps_declaration_and_empty_tags() {
        let xml = wrap_body(r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr></w:p><w:sectPr/>"#);
        let doc = XmlDocument::parse(&xml).unwrap();
        let out = doc.to_xml().unwrap();

        assert!(out.starts_with("<?xml"));
        assert!(out.contains(r#"<w:jc w:val="left"/>"#));
        assert!(out.contains("<w:sectPr/>"));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        let result = XmlDocument::parse(&wrap_body("<w:p><w:r></w:p>"));
        assert!(matches!(result, Err(AppError::Xml(XmlError::Parse { .. }))));

        let unclosed = XmlDocument::parse("<w:document><w:body>");
        assert!(matches!(unclosed, Err(AppError::Xml(XmlError::Parse { .. }))));
    }

    #[test]
    fn test_missing_body() {
        let doc = XmlDocument::parse(&format!(r#"<w:document xmlns:w="{}"/>"#, W_NS)).unwrap();
        assert!(matches!(doc.body(), Err(AppError::Xml(XmlError::MissingBody))));
    }

    #[test]
    fn test_detached_node_is_not_attached() {
        let mut doc = XmlDocument::parse(&wrap_body("<w:p/><w:p/>")).unwrap();
        let body = doc.body().unwrap();
        let first = doc.child_elements(body)[0];

        assert!(doc.is_attached(first));
        doc.detach(first);
        assert!(!doc.is_attached(first));
        assert_eq!(doc.child_elements(body).len(), 1);
    }

    #[test]
    fn test_default_namespace_document_gets_bound_prefix() {
        let xml = format!(
            r#"<document xmlns="{}"><body><p><r><t>x</t></r></p></body></document>"#,
            W_NS
        );
        let mut doc = XmlDocument::parse(&xml).unwrap();
        let body = doc.body().unwrap();
        let p = doc.child_elements(body)[0];

        let ppr = doc.ensure_properties(p, Tag::ParagraphProps);
        let jc = doc.upsert_property(ppr, "jc");
        doc.set_w_attr(jc, "val", "center");

        let out = doc.to_xml().unwrap();
        assert!(out.contains(&format!(r#"xmlns:w="{}""#, W_NS)));

        // 新建的 w:pPr / w:jc 在重新解析后仍能按命名空间识别
        let again = XmlDocument::parse(&out).unwrap();
        let p = again.child_elements(again.body().unwrap())[0];
        let ppr = again.first_child_with_tag(p, Tag::ParagraphProps).unwrap();
        let jc = again.w_child(ppr, "jc").unwrap();
        assert_eq!(again.w_attr(jc, "val"), Some("center"));
    }

    #[test]
    fn test_fresh_prefix_when_w_is_taken() {
        let xml = format!(
            r#"<document xmlns="{}" xmlns:w="urn:other"><body><p><pPr><jc/></pPr></p></body></document>"#,
            W_NS
        );
        let mut doc = XmlDocument::parse(&xml).unwrap();
        let body = doc.body().unwrap();
        let p = doc.child_elements(body)[0];
        let ppr = doc.first_child_with_tag(p, Tag::ParagraphProps).unwrap();

        // 已有的无前缀 jc 直接复用，不会再插一个
        let existing = doc.w_child(ppr, "jc").unwrap();
        assert_eq!(doc.upsert_property(ppr, "jc"), existing);
        doc.set_w_attr(existing, "val", "center");

        let out = doc.to_xml().unwrap();
        assert!(out.contains(&format!(r#"xmlns:w0="{}""#, W_NS)));
        assert!(out.contains(r#"<jc w0:val="center"/>"#));
    }

    #[test]
    fn test_math_and_symbol_are_classified() {
        let xml = format!(
            r#"<w:document xmlns:w="{}" xmlns:m="{}"><w:body><w:p><m:oMathPara><m:oMath/></m:oMathPara><w:r><w:sym w:char="F0B7"/></w:r></w:p></w:body></w:document>"#,
            W_NS, MATH_NS
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        let body = doc.body().unwrap();

        assert_eq!(doc.elements_with_tag(body, Tag::Math).len(), 2);
        assert_eq!(doc.elements_with_tag(body, Tag::Symbol).len(), 1);
    }

    #[test]
    fn test_upsert_property_respects_schema_order() {
        let mut doc = XmlDocument::parse(&wrap_body(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:sz w:val="24"/></w:rPr></w:r></w:p>"#,
        ))
        .unwrap();
        let body = doc.body().unwrap();
        let run = doc.elements_with_tag(body, Tag::Run)[0];
        let rpr = doc.ensure_properties(run, Tag::RunProps);

        let color = doc.upsert_property(rpr, "color");
        let bold = doc.upsert_property(rpr, "b");
        assert_eq!(doc.upsert_property(rpr, "b"), bold);

        let names: Vec<String> = doc
            .child_elements(rpr)
            .into_iter()
            .map(|id| doc.element(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["w:rFonts", "w:b", "w:color", "w:sz"]);
        assert_ne!(color, bold);
    }
}
