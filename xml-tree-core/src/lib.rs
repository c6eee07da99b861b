//! Owned XML element trees: parse with quick-xml, walk, copy, and write back.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, parse_reader, ParseError};
pub use tree::{Iter, XmlNode};
pub use writer::{write, write_document, write_file, WriteError};
