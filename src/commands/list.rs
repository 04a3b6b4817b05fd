//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::{Blog, Post, TermCount};
use crate::Site;

/// Filters applied to post listings
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub tag: Option<String>,
    pub category: Option<String>,
}

/// List site content by type
pub fn run(site: &Site, content_type: &str, filter: &ListFilter) -> Result<()> {
    let blog = site.load_blog()?;
    print!("{}", render(&blog, content_type, filter)?);
    Ok(())
}

/// Render a listing as text
pub fn render(blog: &Blog, content_type: &str, filter: &ListFilter) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = filtered(blog, filter);
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                write_post(&mut out, post)?;
            }
        }
        "featured" => {
            let posts: Vec<&Post> = filtered(blog, filter)
                .into_iter()
                .filter(|p| p.featured)
                .collect();
            writeln!(out, "Featured posts ({}):", posts.len())?;
            for post in posts {
                write_post(&mut out, post)?;
            }
        }
        "tag" | "tags" => {
            write_terms(&mut out, "Tags", &blog.tags())?;
        }
        "category" | "categories" => {
            write_terms(&mut out, "Categories", &blog.categories())?;
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, featured, tags, categories",
                content_type
            );
        }
    }

    Ok(out)
}

/// Posts matching every given filter, newest first
fn filtered<'a>(blog: &'a Blog, filter: &ListFilter) -> Vec<&'a Post> {
    blog.all()
        .iter()
        .filter(|p| filter.tag.as_deref().map_or(true, |t| p.has_tag(t)))
        .filter(|p| filter.category.as_deref().map_or(true, |c| p.in_category(c)))
        .collect()
}

fn write_post(out: &mut String, post: &Post) -> std::fmt::Result {
    let date = post
        .date
        .as_ref()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    writeln!(
        out,
        "  {} - {} [{}] ({}{})",
        date,
        post.title,
        post.slug,
        post.category,
        if post.featured { ", featured" } else { "" }
    )
}

fn write_terms(out: &mut String, label: &str, terms: &[TermCount]) -> std::fmt::Result {
    writeln!(out, "{} ({}):", label, terms.len())?;
    for term in terms {
        writeln!(out, "  {} ({})", term.name, term.count)?;
    }
    Ok(())
}
