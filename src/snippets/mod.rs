pub mod core;
pub mod selection;

pub use self::core::{strip_indent, Language, SnippetError, SnippetTable};
