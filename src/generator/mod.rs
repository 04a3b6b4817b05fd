//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;
use walkdir::WalkDir;

use crate::content::{Blog, Post};
use crate::helpers::{
    date_xml, escape_xml, full_url_for, meta_generator, short_date, strip_html,
    strip_invalid_xml_chars, toc, url_for,
};
use crate::templates::{
    category_path, tag_path, NavLink, NavPost, PageMeta, PaginationData, PostCard, TemplateRenderer,
    TermData,
};
use crate::Site;

lazy_static! {
    static ref ROOT_RELATIVE_URL: Regex = Regex::new(r#"(href|src)=(["'])/([^/])"#).unwrap();
}

/// What a build wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub tags: usize,
    pub categories: usize,
    pub assets: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

/// Marketing pages rendered from configuration alone
const STATIC_PAGES: [(&str, &str, &str); 4] = [
    ("/services/", "services.html", "Our Services"),
    ("/about/", "about.html", "About Us"),
    ("/contact/", "contact.html", "Contact Us"),
    ("/contact/thanks/", "thanks.html", "Thank You"),
];

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = TemplateRenderer::new(&site.config)?;

        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, blog: &Blog) -> Result<BuildReport> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut report = BuildReport {
            posts: blog.len(),
            ..Default::default()
        };

        // Static assets first so generated pages win on a path clash
        report.assets = self.copy_static_assets()?;

        report.pages += self.generate_home(blog)?;
        report.pages += self.generate_static_pages()?;
        report.pages += self.generate_blog_index(blog)?;
        report.pages += self.generate_post_pages(blog)?;

        let (tags, categories) = self.generate_term_pages(blog)?;
        report.tags = tags;
        report.categories = categories;
        report.pages += tags + categories;

        self.generate_not_found()?;
        self.generate_atom_feed(blog)?;
        self.generate_sitemap(blog)?;
        self.generate_robots()?;
        self.generate_search_index(blog)?;

        Ok(report)
    }

    /// Head metadata for an ordinary page
    fn page_meta(&self, title: &str, description: &str, path: &str) -> PageMeta {
        let config = &self.site.config;
        PageMeta {
            title: config.page_title(title),
            description: if description.is_empty() {
                config.description.clone()
            } else {
                description.to_string()
            },
            canonical: full_url_for(config, path),
            og_type: "website".to_string(),
            og_image: None,
            published_time: None,
            author: None,
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, current_path: &str, meta: &PageMeta) -> Context {
        let config = &self.site.config;
        let now = chrono::Utc::now().with_timezone(&config.tz());

        let mut context = Context::new();
        context.insert("config", config);
        context.insert("nav", &NavLink::build(config, current_path));
        context.insert("meta", meta);
        context.insert("current_path", current_path);
        context.insert("current_year", &now.year());
        context.insert("generator", &meta_generator());
        context
    }

    fn cards<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Vec<PostCard> {
        posts
            .into_iter()
            .map(|p| PostCard::from_post(&self.site.config, p))
            .collect()
    }

    /// Write `html` to `<public>/<path>/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        // Strip leading slash from path to avoid creating absolute paths
        let clean_path = path.trim_start_matches('/');
        let output_path = self.site.public_dir.join(clean_path).join("index.html");
        self.write_file(&output_path, html)
    }

    fn write_file(&self, output_path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Generate the home page
    fn generate_home(&self, blog: &Blog) -> Result<usize> {
        let meta = self.page_meta("", "", "/");
        let mut context = self.create_base_context("/", &meta);
        context.insert(
            "latest_posts",
            &self.cards(blog.recent(self.site.config.blog.home_limit)),
        );

        let html = self.renderer.render("home.html", &context)?;
        self.write_page("/", &html)?;
        Ok(1)
    }

    /// Generate services, about, contact and the quote confirmation page
    fn generate_static_pages(&self) -> Result<usize> {
        for (path, template, title) in STATIC_PAGES {
            let meta = self.page_meta(title, "", path);
            let context = self.create_base_context(path, &meta);
            let html = self.renderer.render(template, &context)?;
            self.write_page(path, &html)?;
        }
        Ok(STATIC_PAGES.len())
    }

    /// Generate blog index pages with pagination
    fn generate_blog_index(&self, blog: &Blog) -> Result<usize> {
        let config = &self.site.config;
        let per_page = config.blog.per_page.max(1);
        let pages = blog.paginate(per_page);
        let total_pages = pages.len();

        let featured = self.cards(
            blog.featured()
                .into_iter()
                .take(config.blog.featured_limit),
        );
        let categories: Vec<TermData> = blog
            .categories()
            .iter()
            .map(|t| TermData::category(config, t))
            .collect();
        let tags: Vec<TermData> = blog.tags().iter().map(|t| TermData::tag(config, t)).collect();

        for (i, page_posts) in pages.iter().enumerate() {
            let page_num = i + 1;
            let current_path = blog_page_path(page_num);

            let pagination = PaginationData {
                per_page,
                total: total_pages,
                current: page_num,
                prev_link: if page_num > 1 {
                    url_for(config, &blog_page_path(page_num - 1))
                } else {
                    String::new()
                },
                next_link: if page_num < total_pages {
                    url_for(config, &blog_page_path(page_num + 1))
                } else {
                    String::new()
                },
            };

            let title = if page_num == 1 {
                "Blog".to_string()
            } else {
                format!("Blog - Page {}", page_num)
            };
            let meta = self.page_meta(
                &title,
                "Insurance tips, guides and community news for Diné families and businesses.",
                &current_path,
            );
            let mut context = self.create_base_context(&current_path, &meta);
            context.insert("page_posts", &self.cards(page_posts.iter()));
            context.insert("pagination", &pagination);
            // Featured posts and term lists only head the first page
            if page_num == 1 {
                context.insert("featured_posts", &featured);
                context.insert("categories", &categories);
                context.insert("tags", &tags);
            } else {
                context.insert("featured_posts", &Vec::<PostCard>::new());
                context.insert("categories", &Vec::<TermData>::new());
                context.insert("tags", &Vec::<TermData>::new());
            }

            let html = self.renderer.render("blog_index.html", &context)?;
            self.write_page(&current_path, &html)?;
        }

        tracing::info!("Generated {} blog index pages", total_pages);
        Ok(total_pages)
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, blog: &Blog) -> Result<usize> {
        let config = &self.site.config;

        for post in blog.all() {
            let path = post.path();
            let (newer, older) = blog.neighbors(&post.slug);
            let nav_post = |p: &Post| NavPost {
                title: p.title.clone(),
                path: url_for(config, &p.path()),
            };

            // Generate table of contents
            let toc_html = toc(&post.html, config.blog.toc_depth);
            // Check if TOC has actual content (not just empty <ol class="toc"></ol>)
            let has_toc = toc_html.contains("toc-item");

            let mut meta = self.page_meta(&post.title, &post.description, &path);
            meta.og_type = "article".to_string();
            meta.published_time = post.date.as_ref().map(|d| date_xml(d, &config.tz()));
            meta.author = Some(post.author.clone());
            meta.og_image = post.image.as_ref().map(|img| full_url_for(config, &img.src));

            let mut context = self.create_base_context(&path, &meta);
            context.insert("post", &PostCard::from_post(config, post));
            context.insert("content", &post.html);
            context.insert("toc", &toc_html);
            context.insert("show_toc", &has_toc);
            if let Some(p) = newer {
                context.insert("newer_post", &nav_post(p));
            }
            if let Some(p) = older {
                context.insert("older_post", &nav_post(p));
            }

            let html = self.renderer.render("post.html", &context)?;
            self.write_page(&path, &html)?;
        }

        tracing::info!("Generated {} post pages", blog.len());
        Ok(blog.len())
    }

    /// Generate tag and category listing pages
    fn generate_term_pages(&self, blog: &Blog) -> Result<(usize, usize)> {
        let mut tag_count = 0;
        let mut written = HashSet::new();
        for term in blog.tags() {
            let path = tag_path(&term.name);
            if !written.insert(path.clone()) {
                tracing::warn!("Tag {:?} collides with another tag at {}", term.name, path);
                continue;
            }
            self.render_term_page("Tag", &term.name, &path, blog.by_tag(&term.name))?;
            tag_count += 1;
        }

        let mut category_count = 0;
        for term in blog.categories() {
            let path = category_path(&term.name);
            if !written.insert(path.clone()) {
                tracing::warn!(
                    "Category {:?} collides with another category at {}",
                    term.name,
                    path
                );
                continue;
            }
            self.render_term_page("Category", &term.name, &path, blog.by_category(&term.name))?;
            category_count += 1;
        }

        tracing::info!(
            "Generated {} tag pages and {} category pages",
            tag_count,
            category_count
        );
        Ok((tag_count, category_count))
    }

    fn render_term_page(&self, kind: &str, name: &str, path: &str, posts: Vec<&Post>) -> Result<()> {
        let meta = self.page_meta(
            &format!("{}: {}", kind, name),
            &format!("Articles filed under {}", name),
            path,
        );
        let mut context = self.create_base_context(path, &meta);
        context.insert("term_kind", kind);
        context.insert("term_name", name);
        context.insert("term_posts", &self.cards(posts));

        let html = self.renderer.render("term.html", &context)?;
        self.write_page(path, &html)
    }

    /// Generate the 404 page served for unknown paths
    fn generate_not_found(&self) -> Result<()> {
        let meta = self.page_meta("Page Not Found", "", "/404.html");
        let context = self.create_base_context("/404.html", &meta);
        let html = self.renderer.render("404.html", &context)?;
        self.write_file(&self.site.public_dir.join("404.html"), &html)
    }

    /// Generate Atom feed
    fn generate_atom_feed(&self, blog: &Blog) -> Result<()> {
        let config = &self.site.config;
        let tz = config.tz();
        let base_url = config.url.trim_end_matches('/');

        let updated = blog
            .all()
            .iter()
            .filter_map(|p| p.updated.or(p.date))
            .max()
            .map(|d| date_xml(&d, &tz))
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            escape_xml(&config.tagline)
        ));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "/atom.xml")
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", full_url_for(config, "/")));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", full_url_for(config, "/")));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in blog.all().iter().take(config.blog.feed_limit) {
            let link = full_url_for(config, &post.path());
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            if let Some(date) = &post.date {
                feed.push_str(&format!(
                    "    <published>{}</published>\n",
                    date_xml(date, &tz)
                ));
            }
            if let Some(date) = post.updated.or(post.date) {
                feed.push_str(&format!(
                    "    <updated>{}</updated>\n",
                    date_xml(&date, &tz)
                ));
            }
            feed.push_str(&format!(
                "    <author><name>{}</name></author>\n",
                escape_xml(&post.author)
            ));
            feed.push_str(&format!(
                "    <category term=\"{}\"/>\n",
                escape_xml(&post.category)
            ));
            for tag in &post.tags {
                feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(tag)));
            }
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                escape_xml(&post.excerpt)
            ));
            // Convert relative URLs in content to absolute URLs
            let content = convert_relative_urls_to_absolute(&post.html, base_url);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                strip_invalid_xml_chars(&content).replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        self.write_file(&self.site.public_dir.join("atom.xml"), &feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate sitemap.xml listing every generated page
    fn generate_sitemap(&self, blog: &Blog) -> Result<()> {
        let config = &self.site.config;

        let mut entries: Vec<(String, Option<String>)> = vec![("/".to_string(), None)];
        entries.extend(STATIC_PAGES.iter().map(|(path, _, _)| (path.to_string(), None)));
        for page_num in 1..=blog.paginate(config.blog.per_page.max(1)).len() {
            entries.push((blog_page_path(page_num), None));
        }
        for post in blog.all() {
            let lastmod = post.updated.or(post.date).as_ref().map(short_date);
            entries.push((post.path(), lastmod));
        }
        for term in blog.tags() {
            entries.push((tag_path(&term.name), None));
        }
        for term in blog.categories() {
            entries.push((category_path(&term.name), None));
        }

        let mut sitemap = String::new();
        sitemap.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        sitemap.push('\n');
        sitemap.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        sitemap.push('\n');
        let mut seen = HashSet::new();
        for (path, lastmod) in entries {
            if !seen.insert(path.clone()) {
                continue;
            }
            sitemap.push_str("  <url>\n");
            sitemap.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&full_url_for(config, &path))
            ));
            if let Some(lastmod) = lastmod {
                sitemap.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
            }
            sitemap.push_str("  </url>\n");
        }
        sitemap.push_str("</urlset>\n");

        self.write_file(&self.site.public_dir.join("sitemap.xml"), &sitemap)?;
        tracing::info!("Generated sitemap.xml");
        Ok(())
    }

    fn generate_robots(&self) -> Result<()> {
        let robots = format!(
            "User-agent: *\nAllow: /\n\nSitemap: {}\n",
            full_url_for(&self.site.config, "/sitemap.xml")
        );
        self.write_file(&self.site.public_dir.join("robots.txt"), &robots)
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, blog: &Blog) -> Result<()> {
        let config = &self.site.config;
        let search_data: Vec<serde_json::Value> = blog
            .all()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.title,
                    "slug": p.slug,
                    "url": url_for(config, &p.path()),
                    "description": p.description,
                    "excerpt": p.excerpt,
                    "category": p.category,
                    "tags": p.tags,
                    "date": p.date.as_ref().map(short_date),
                    "content": strip_html(&p.html),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&search_data)?;
        self.write_file(&self.site.public_dir.join("search.json"), &json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy static assets (images, css, etc.) to public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest: PathBuf = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(copied)
    }
}

/// Path of a blog index page; the first page lives at `/blog/`
fn blog_page_path(page_num: usize) -> String {
    if page_num <= 1 {
        "/blog/".to_string()
    } else {
        format!("/blog/page/{}/", page_num)
    }
}

/// Convert root-relative URLs in HTML content to absolute URLs
///
/// Handles `href` and `src` with either quote style. Protocol-relative
/// values (`//host/...`) are left alone.
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    ROOT_RELATIVE_URL
        .replace_all(content, |caps: &Captures| {
            format!("{}={}{}/{}", &caps[1], &caps[2], base_url, &caps[3])
        })
        .into_owned()
}
