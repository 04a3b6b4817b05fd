//! Blog post model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use super::frontmatter::ImageRef;
use super::reading_time::ReadingTime;
use crate::helpers::format_date;

/// A cover image with alt text
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostImage {
    pub src: String,
    pub alt: String,
}

impl PostImage {
    /// Resolve a front-matter image, using the post title as fallback alt text
    pub fn from_ref(image: ImageRef, title: &str) -> Self {
        match image {
            ImageRef::Path(src) => Self {
                src,
                alt: title.to_string(),
            },
            ImageRef::Detailed { src, alt } => {
                let alt = if alt.is_empty() { title.to_string() } else { alt };
                Self { src, alt }
            }
        }
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// File name without extension; addresses the post at `/blog/<slug>/`
    pub slug: String,

    pub title: String,
    pub description: String,

    /// Publication date, when the front-matter date parses
    pub date: Option<NaiveDateTime>,

    /// Date exactly as written in the front-matter
    pub date_raw: String,

    pub updated: Option<NaiveDateTime>,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub draft: bool,
    pub image: Option<PostImage>,
    pub reading_time: ReadingTime,

    /// Raw markdown body
    pub content: String,

    /// Rendered HTML body
    pub html: String,

    /// Plain-text summary for cards and meta descriptions
    pub excerpt: String,

    /// Full source file path
    pub source: PathBuf,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a post with minimal required fields
    pub fn new(slug: &str, title: &str, source: PathBuf) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            description: String::new(),
            date: None,
            date_raw: String::new(),
            updated: None,
            author: String::new(),
            category: String::new(),
            tags: Vec::new(),
            featured: false,
            draft: false,
            image: None,
            reading_time: super::reading_time("", 0),
            content: String::new(),
            html: String::new(),
            excerpt: String::new(),
            source,
            extra: HashMap::new(),
        }
    }

    /// URL path of the post page
    pub fn path(&self) -> String {
        format!("/blog/{}/", self.slug)
    }

    /// Human-readable date, falling back to the raw front-matter text
    pub fn display_date(&self) -> String {
        match &self.date {
            Some(date) => format_date(date),
            None => self.date_raw.clone(),
        }
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Case-insensitive category match
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Order posts newest first
///
/// Undated posts sort after every dated post; ties fall back to the slug so
/// output order is stable across runs.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    let by_date = match (&a.date, &b.date) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.slug.cmp(&b.slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::parse_date_string;

    fn post(slug: &str, date: Option<&str>) -> Post {
        let mut post = Post::new(slug, slug, PathBuf::from(format!("{}.md", slug)));
        post.date = date.and_then(parse_date_string);
        post
    }

    #[test]
    fn test_newest_first() {
        let mut posts = vec![
            post("undated", None),
            post("old", Some("2023-01-01")),
            post("new", Some("2024-06-01")),
            post("also-new", Some("2024-06-01")),
        ];
        posts.sort_by(newest_first);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["also-new", "new", "old", "undated"]);
    }

    #[test]
    fn test_tag_and_category_matching() {
        let mut p = post("x", None);
        p.tags = vec!["Auto Safety".to_string()];
        p.category = "Auto".to_string();
        assert!(p.has_tag("auto safety"));
        assert!(!p.has_tag("auto"));
        assert!(p.in_category("AUTO"));
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        let mut p = post("x", Some("2024-01-05"));
        assert_eq!(p.display_date(), "January 5, 2024");
        p.date = None;
        p.date_raw = "Spring 2024".to_string();
        assert_eq!(p.display_date(), "Spring 2024");
    }

    #[test]
    fn test_image_alt_fallback() {
        let img = PostImage::from_ref(ImageRef::Path("/a.jpg".to_string()), "Title");
        assert_eq!(img.alt, "Title");
    }
}
