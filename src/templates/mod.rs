//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary; the generator only supplies
//! the data structures below as context.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Post, PostImage, TermCount};
use crate::helpers::{self, is_active, url_for};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("services.html", include_str!("site/services.html")),
            ("about.html", include_str!("site/about.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("thanks.html", include_str!("site/thanks.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("post.html", include_str!("site/post.html")),
            ("term.html", include_str!("site/term.html")),
            ("404.html", include_str!("site/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            ("partials/cta.html", include_str!("site/partials/cta.html")),
            (
                "partials/pager.html",
                include_str!("site/partials/pager.html"),
            ),
        ])?;

        // Autoescape stays on for .html templates, without Tera's `/` escaping
        tera.set_escape_fn(helpers::html_escape);

        // Register custom filters and functions
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        let site = config.clone();
        tera.register_function(
            "url_for",
            move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
                let path = match args.get("path") {
                    Some(val) => tera::try_get_value!("url_for", "path", String, val),
                    None => String::new(),
                };
                Ok(tera::Value::String(url_for(&site, &path)))
            },
        );

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(helpers::truncate(
        &s,
        length,
        Some(&omission),
    )))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub path: String,
    pub active: bool,
}

impl NavLink {
    pub fn build(config: &SiteConfig, current_path: &str) -> Vec<NavLink> {
        config
            .nav
            .iter()
            .map(|item| NavLink {
                name: item.name.clone(),
                path: url_for(config, &item.path),
                active: is_active(&item.path, current_path),
            })
            .collect()
    }
}

/// Head metadata for a page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Full `<title>` text
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: String,
    pub og_image: Option<String>,
    pub published_time: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermLink {
    pub name: String,
    pub path: String,
}

/// A post as shown on cards and listings
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub path: String,
    pub title: String,
    pub description: String,
    pub excerpt: String,
    pub date: String,
    pub date_iso: String,
    pub author: String,
    pub category: TermLink,
    pub tags: Vec<TermLink>,
    pub featured: bool,
    pub image: Option<PostImage>,
    pub reading_time: String,
}

impl PostCard {
    pub fn from_post(config: &SiteConfig, post: &Post) -> Self {
        PostCard {
            slug: post.slug.clone(),
            path: url_for(config, &post.path()),
            title: post.title.clone(),
            description: post.description.clone(),
            excerpt: post.excerpt.clone(),
            date: post.display_date(),
            date_iso: post
                .date
                .as_ref()
                .map(helpers::short_date)
                .unwrap_or_default(),
            author: post.author.clone(),
            category: TermLink {
                name: post.category.clone(),
                path: url_for(config, &category_path(&post.category)),
            },
            tags: post
                .tags
                .iter()
                .map(|t| TermLink {
                    name: t.clone(),
                    path: url_for(config, &tag_path(t)),
                })
                .collect(),
            featured: post.featured,
            image: post.image.as_ref().map(|img| PostImage {
                src: url_for(config, &img.src),
                alt: img.alt.clone(),
            }),
            reading_time: post.reading_time.text.clone(),
        }
    }
}

/// A tag or category with its listing page and post count
#[derive(Debug, Clone, Serialize)]
pub struct TermData {
    pub name: String,
    pub path: String,
    pub count: usize,
}

impl TermData {
    pub fn tag(config: &SiteConfig, term: &TermCount) -> Self {
        Self {
            name: term.name.clone(),
            path: url_for(config, &tag_path(&term.name)),
            count: term.count,
        }
    }

    pub fn category(config: &SiteConfig, term: &TermCount) -> Self {
        Self {
            name: term.name.clone(),
            path: url_for(config, &category_path(&term.name)),
            count: term.count,
        }
    }
}

/// URL path of a tag listing page
pub fn tag_path(tag: &str) -> String {
    format!("/blog/tags/{}/", slug::slugify(tag))
}

/// URL path of a category listing page
pub fn category_path(category: &str) -> String {
    format!("/blog/category/{}/", slug::slugify(category))
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub prev_link: String,
    pub next_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_templates_parse() {
        assert!(TemplateRenderer::new(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_post_card_links() {
        let config = SiteConfig::default();
        let mut post = Post::new("winter-driving", "Winter Driving", PathBuf::from("x.md"));
        post.category = "Auto Safety".to_string();
        post.tags = vec!["Diné Roads".to_string()];

        let card = PostCard::from_post(&config, &post);
        assert_eq!(card.path, "/blog/winter-driving/");
        assert_eq!(card.category.path, "/blog/category/auto-safety/");
        assert_eq!(card.tags[0].path, "/blog/tags/dine-roads/");
    }

    #[test]
    fn test_nav_marks_active_section() {
        let config = SiteConfig::default();
        let nav = NavLink::build(&config, "/blog/some-post/");
        let active: Vec<_> = nav.iter().filter(|n| n.active).map(|n| n.name.as_str()).collect();
        assert_eq!(active, vec!["Blog"]);
    }

    #[test]
    fn test_escaping_keeps_urls_readable() {
        let renderer = TemplateRenderer::new(&SiteConfig::default()).unwrap();
        let mut context = Context::new();
        context.insert("term_kind", "Tag");
        context.insert("term_name", "Home & <Land>");
        context.insert("term_posts", &Vec::<PostCard>::new());
        context.insert("config", &SiteConfig::default());
        context.insert("nav", &NavLink::build(&SiteConfig::default(), "/blog/"));
        context.insert(
            "meta",
            &PageMeta {
                title: "Tag | Diné Insurance".to_string(),
                description: String::new(),
                canonical: "https://dine-insurance.netlify.app/blog/".to_string(),
                og_type: "website".to_string(),
                og_image: None,
                published_time: None,
                author: None,
            },
        );
        context.insert("current_year", &2024);
        context.insert("generator", &helpers::meta_generator());

        let html = renderer.render("term.html", &context).unwrap();
        assert!(html.contains("Home &amp; &lt;Land&gt;"));
        assert!(html.contains(r#"href="https://dine-insurance.netlify.app/blog/""#));
        assert!(html.contains(r#"<meta name="generator""#));
    }

    #[test]
    fn test_truncate_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(8));
        let out = truncate_chars_filter(&tera::Value::from("Hello World"), &args).unwrap();
        assert_eq!(out, tera::Value::from("Hello..."));
    }
}
