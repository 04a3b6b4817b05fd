//! Show a single post's metadata

use anyhow::Result;
use std::fmt::Write;

use crate::content::{ContentLoader, Post};
use crate::Site;

/// Print a post looked up by slug
///
/// Drafts are shown too. A missing post is an error so the process exits
/// non-zero.
pub fn run(site: &Site, slug: &str) -> Result<()> {
    let post = ContentLoader::new(site).load_by_slug(slug)?;
    print!("{}", render(&post)?);
    Ok(())
}

/// Render a post summary as text
pub fn render(post: &Post) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", post.title)?;
    writeln!(out, "  slug:        {}", post.slug)?;
    writeln!(out, "  path:        {}", post.path())?;
    writeln!(out, "  date:        {}", post.display_date())?;
    if let Some(updated) = &post.updated {
        writeln!(out, "  updated:     {}", updated.format("%Y-%m-%d"))?;
    }
    writeln!(out, "  author:      {}", post.author)?;
    writeln!(out, "  category:    {}", post.category)?;
    writeln!(out, "  tags:        {}", post.tags.join(", "))?;
    writeln!(out, "  featured:    {}", post.featured)?;
    if post.draft {
        writeln!(out, "  draft:       true")?;
    }
    writeln!(out, "  read time:   {}", post.reading_time.text)?;
    writeln!(out, "  words:       {}", post.reading_time.words)?;
    if !post.description.is_empty() {
        writeln!(out, "  description: {}", post.description)?;
    }
    writeln!(out, "  source:      {}", post.source.display())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_show_existing_post() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        fs::create_dir_all(&site.blog_dir).unwrap();
        fs::write(
            site.blog_dir.join("hogan-coverage.md"),
            "---\ntitle: Insuring a Hogan\ndate: 2024-03-02\ntags: [home, tradition]\n---\nA hogan is a home.\n",
        )
        .unwrap();

        let post = ContentLoader::new(&site).load_by_slug("hogan-coverage").unwrap();
        let text = render(&post).unwrap();
        assert!(text.starts_with("Insuring a Hogan\n"));
        assert!(text.contains("date:        March 2, 2024"));
        assert!(text.contains("tags:        home, tradition"));
        assert!(text.contains("path:        /blog/hogan-coverage/"));
    }

    #[test]
    fn test_show_missing_post_fails() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        let err = run(&site, "no-such-post").unwrap_err();
        assert_eq!(err.to_string(), "post not found: no-such-post");
    }
}
