//! Create a new blog post

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::helpers::slugify;
use crate::Site;

/// Options for a new post beyond its title
#[derive(Debug, Clone, Default)]
pub struct NewPostOptions {
    /// File name without extension; derived from the title when unset
    pub slug: Option<String>,
    pub featured: bool,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct NewFrontMatter<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    author: &'a str,
    category: &'a str,
    tags: &'a [String],
    featured: bool,
}

/// Create `<blog dir>/<slug>.md` with front-matter filled in
///
/// Returns the path of the new file. An existing post is never overwritten.
pub fn create_post(site: &Site, title: &str, options: &NewPostOptions) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Post title must not be empty");
    }

    let slug = match options.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}; pass --slug", title);
    }

    let blog_dir = &site.blog_dir;
    fs::create_dir_all(blog_dir).with_context(|| format!("Failed to create {:?}", blog_dir))?;

    // Check if a post with this slug already exists
    for ext in ["md", "mdx"] {
        let existing = blog_dir.join(format!("{}.{}", slug, ext));
        if existing.exists() {
            anyhow::bail!("File already exists: {:?}", existing);
        }
    }

    let blog = &site.config.blog;
    let front_matter = NewFrontMatter {
        title,
        description: "",
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        author: &blog.default_author,
        category: options
            .category
            .as_deref()
            .unwrap_or(&blog.default_category),
        tags: &options.tags,
        featured: options.featured,
    };
    let yaml = serde_yaml::to_string(&front_matter)?;
    let content = format!("---\n{}---\n\nWrite your post here.\n", yaml);

    let file_path = blog_dir.join(format!("{}.md", slug));
    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
