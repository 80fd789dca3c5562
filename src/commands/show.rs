//! Show a single post

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::display_date;
use crate::content::{ContentRepository, MarkdownRenderer};
use crate::Blog;

/// Print one post, drafts and scheduled posts included
pub fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    let repo = blog.repository();
    print!("{}", render(&repo, slug, html, Utc::now())?);
    Ok(())
}

/// Metadata header followed by the markdown body, or its HTML rendering
pub fn render(
    repo: &ContentRepository,
    slug: &str,
    html: bool,
    now: DateTime<Utc>,
) -> Result<String> {
    let Some(post) = repo.get_by_slug(slug, now) else {
        anyhow::bail!("No post found for slug: {}", slug);
    };

    let mut out = String::new();
    out.push_str(&format!("Title:        {}\n", post.title));
    out.push_str(&format!("Status:       {}\n", post.status(now)));
    out.push_str(&format!("Date:         {}\n", display_date(&post)));
    out.push_str(&format!("Author:       {}\n", post.author));
    out.push_str(&format!("Reading time: {} min\n", post.reading_time));
    if !post.tags.is_empty() {
        out.push_str(&format!("Tags:         {}\n", post.tags.join(", ")));
    }
    if let Some(image) = &post.image {
        out.push_str(&format!("Image:        {} ({})\n", image, post.image_alt));
    }
    if !post.description.is_empty() {
        out.push_str(&format!("\n{}\n", post.description));
    }
    out.push('\n');

    if html {
        out.push_str(&post.render_html(&MarkdownRenderer::new()));
    } else {
        out.push_str(&post.content);
    }

    Ok(out)
}
