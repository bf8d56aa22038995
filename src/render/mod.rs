//! Rendering module for converting analyzed documents to output formats.

mod html;
mod json;
mod markdown;
mod options;

pub use html::{chapter_file_name, chapter_html, navigation, sanitize_filename, NavPoint};
pub use json::{from_json, to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
