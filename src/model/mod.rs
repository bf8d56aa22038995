//! Document model types.
//!
//! This module defines both sides of the analyzer: the layout-annotated
//! input (`TextBlock`, `SourcePage`, `SourceDocument`) and the inferred
//! logical structure (`Document`, `Chapter`, `Heading`).

mod block;
mod diagnostic;
mod document;
mod page;
mod toc;

pub use block::{BoundingBox, FontKey, TextBlock};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use document::{Chapter, Document, Heading};
pub use page::{SourceDocument, SourcePage};
pub use toc::TocEntry;
