//! Control-file paragraphs.
//!
//! Package archives, package indexes and repository manifests all share one
//! record format: a paragraph of ordered `Key: value` fields, where a value
//! may continue over several lines. Indexes hold many paragraphs separated
//! by blank lines.
//!
//! ```
//! use shelf_control::Paragraph;
//!
//! let mut paragraph: Paragraph = "Package: hello\nVersion: 2.10-3\n".parse().unwrap();
//! paragraph.set("Size", "1024");
//! assert_eq!(paragraph.get("package"), Some("hello"));
//! assert_eq!(paragraph.to_string(), "Package: hello\nVersion: 2.10-3\nSize: 1024\n");
//! ```

pub mod aptconf;
pub mod error;
mod paragraph;
mod parse;

pub use crate::paragraph::Paragraph;
pub use crate::parse::parse_paragraphs;
