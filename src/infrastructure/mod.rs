pub mod docx_package;
pub mod xml_tree;

pub use docx_package::{DocxPackage, DOCUMENT_PART};
pub use xml_tree::{Tag, XmlDocument, MATH_NS, VML_NS, W_NS};
