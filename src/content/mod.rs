//! Content module - posts, front-matter and markdown processing

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod preview;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentRepository;
pub use markdown::MarkdownRenderer;
pub use post::{reading_time, Post, PostDefaults, PostStatus};
pub use preview::PreviewSummary;
