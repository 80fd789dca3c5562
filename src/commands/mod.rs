//! CLI command implementations

pub mod list;
pub mod preview;
pub mod show;

use crate::content::Post;

/// Calendar date of a post for terminal output, or the raw value when it
/// could not be parsed
pub(crate) fn display_date(post: &Post) -> String {
    post.published_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| post.date.clone())
}
