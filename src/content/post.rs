//! Post model and publish state

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{FrontMatter, MarkdownRenderer};

/// Alt text used when a post has neither `imageAlt` nor `title`
const FALLBACK_IMAGE_ALT: &str = "Blog post image";

/// Title used when the front-matter has none
const UNTITLED: &str = "Untitled";

/// A blog post resolved from one content file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without the `.md`/`.mdx` extension
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Parsed `date`, `None` when it could not be understood
    pub published_at: Option<DateTime<Utc>>,

    pub author: String,

    pub tags: Vec<String>,

    /// Raw markdown body
    pub content: String,

    /// Estimated minutes to read
    pub reading_time: usize,

    /// Cover image path
    pub image: Option<String>,

    pub image_alt: String,

    pub draft: bool,
}

/// Where a post stands relative to an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Explicitly hidden, whatever its date
    Draft,
    /// Not a draft but its date has not arrived yet
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-wide fallbacks applied when building a [`Post`]
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub author: String,
    pub words_per_minute: usize,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            author: "ekkOS Team".to_string(),
            words_per_minute: 200,
        }
    }
}

impl Post {
    /// Build a post from parsed front-matter and body.
    ///
    /// All defaulting happens here. A missing date becomes `now`, so such a
    /// post is published at the instant it is read.
    pub fn from_front_matter(
        slug: &str,
        fm: FrontMatter,
        body: &str,
        defaults: &PostDefaults,
        now: DateTime<Utc>,
    ) -> Self {
        let (date, published_at) = match fm.date {
            Some(ref raw) => (raw.clone(), fm.parse_date()),
            None => (now.to_rfc3339_opts(SecondsFormat::Millis, true), Some(now)),
        };

        let image_alt = fm
            .image_alt
            .or_else(|| fm.title.clone())
            .unwrap_or_else(|| FALLBACK_IMAGE_ALT.to_string());

        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| UNTITLED.to_string()),
            description: fm.description.unwrap_or_default(),
            date,
            published_at,
            author: fm.author.unwrap_or_else(|| defaults.author.clone()),
            tags: fm.tags,
            content: body.to_string(),
            reading_time: reading_time(body, defaults.words_per_minute),
            image: fm.image,
            image_alt,
            draft: fm.draft,
        }
    }

    /// Not a draft and dated at or before `now`
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == PostStatus::Published
    }

    /// Classify the post at `now`. An unparseable date never publishes.
    pub fn status(&self, now: DateTime<Utc>) -> PostStatus {
        if self.draft {
            return PostStatus::Draft;
        }
        match self.published_at {
            Some(at) if at <= now => PostStatus::Published,
            _ => PostStatus::Scheduled,
        }
    }

    /// Exact, case-sensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Render the markdown body to HTML
    pub fn render_html(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.content)
    }
}

/// `ceil(words / words_per_minute)`; an empty body reads in zero minutes
pub fn reading_time(content: &str, words_per_minute: usize) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(words_per_minute.max(1))
}

/// Sort newest first; posts without a usable date go last
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn post_with(fm: FrontMatter, body: &str, now: DateTime<Utc>) -> Post {
        Post::from_front_matter("hello", fm, body, &PostDefaults::default(), now)
    }

    #[test]
    fn test_defaults_applied() {
        let now = at(2024, 3, 1);
        let post = post_with(FrontMatter::default(), "", now);
        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.description, "");
        assert_eq!(post.author, "ekkOS Team");
        assert!(post.tags.is_empty());
        assert_eq!(post.image, None);
        assert_eq!(post.image_alt, "Blog post image");
        assert!(!post.draft);
        assert_eq!(post.date, "2024-03-01T00:00:00.000Z");
        assert_eq!(post.published_at, Some(now));
    }

    #[test]
    fn test_missing_date_is_published_at_read_time() {
        let now = at(2024, 3, 1);
        let post = post_with(FrontMatter::default(), "body", now);
        assert!(post.is_published(now));
    }

    #[test]
    fn test_image_alt_falls_back_to_title() {
        let fm = FrontMatter {
            title: Some("Cover story".to_string()),
            ..Default::default()
        };
        let post = post_with(fm, "", at(2024, 1, 1));
        assert_eq!(post.image_alt, "Cover story");

        let fm = FrontMatter {
            title: Some("Cover story".to_string()),
            image_alt: Some("A lighthouse".to_string()),
            ..Default::default()
        };
        let post = post_with(fm, "", at(2024, 1, 1));
        assert_eq!(post.image_alt, "A lighthouse");
    }

    #[test]
    fn test_author_default_is_configurable() {
        let defaults = PostDefaults {
            author: "Guest".to_string(),
            ..Default::default()
        };
        let post =
            Post::from_front_matter("x", FrontMatter::default(), "", &defaults, at(2024, 1, 1));
        assert_eq!(post.author, "Guest");
    }

    #[test]
    fn test_reading_time() {
        let four_hundred = vec!["word"; 400].join(" ");
        assert_eq!(reading_time(&four_hundred, 200), 2);
        assert_eq!(reading_time("word", 200), 1);
        assert_eq!(reading_time(&vec!["w"; 201].join("\n"), 200), 2);
        assert_eq!(reading_time("", 200), 0);
        assert_eq!(reading_time("  \n\t ", 200), 0);
    }

    #[test]
    fn test_status_draft_beats_date() {
        let now = at(2024, 6, 1);
        let fm = FrontMatter {
            date: Some("2024-01-01".to_string()),
            draft: true,
            ..Default::default()
        };
        let post = post_with(fm, "", now);
        assert_eq!(post.status(now), PostStatus::Draft);
        assert!(!post.is_published(now));
    }

    #[test]
    fn test_status_scheduled_and_boundary() {
        let fm = FrontMatter {
            date: Some("2024-06-01T12:00:00Z".to_string()),
            ..Default::default()
        };
        let post = post_with(fm, "", at(2024, 1, 1));
        let publish_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(
            post.status(publish_at - chrono::Duration::seconds(1)),
            PostStatus::Scheduled
        );
        assert_eq!(post.status(publish_at), PostStatus::Published);
        assert!(post.is_published(publish_at));
    }

    #[test]
    fn test_unparseable_date_never_publishes() {
        let fm = FrontMatter {
            date: Some("someday".to_string()),
            ..Default::default()
        };
        let post = post_with(fm, "", at(2024, 1, 1));
        assert_eq!(post.date, "someday");
        assert_eq!(post.published_at, None);
        assert_eq!(post.status(at(2999, 1, 1)), PostStatus::Scheduled);
    }

    #[test]
    fn test_has_tag_is_case_sensitive() {
        let fm = FrontMatter {
            tags: vec!["Rust".to_string()],
            ..Default::default()
        };
        let post = post_with(fm, "", at(2024, 1, 1));
        assert!(post.has_tag("Rust"));
        assert!(!post.has_tag("rust"));
    }

    #[test]
    fn test_sort_by_date_desc_puts_undated_last() {
        let make = |slug: &str, date: &str| {
            let fm = FrontMatter {
                date: Some(date.to_string()),
                ..Default::default()
            };
            Post::from_front_matter(slug, fm, "", &PostDefaults::default(), at(2024, 1, 1))
        };
        let mut posts = vec![
            make("old", "2023-01-01"),
            make("bad", "not a date"),
            make("new", "2024-05-01"),
        ];
        sort_by_date_desc(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "bad"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let post = post_with(FrontMatter::default(), "one two", at(2024, 1, 1));
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["readingTime"], 1);
        assert_eq!(json["imageAlt"], "Blog post image");
        assert_eq!(
            serde_json::to_value(PostStatus::Scheduled).unwrap(),
            "scheduled"
        );
    }
}
