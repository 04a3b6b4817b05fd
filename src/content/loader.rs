//! Content loader - loads blog posts from the blog directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{BlogError, Result};
use super::markdown::{strip_mdx_module_lines, MarkdownRenderer};
use super::post::{newest_first, Post, PostImage};
use super::{reading_time, FrontMatter};
use crate::config::{BlogConfig, SiteConfig};
use crate::helpers::{extract_excerpt, EXCERPT_LENGTH};
use crate::Site;

/// Post file extensions, in lookup priority order
const POST_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Loads posts from the blog directory
pub struct ContentLoader {
    blog_dir: PathBuf,
    options: BlogConfig,
    exclude: Vec<glob::Pattern>,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for a site
    pub fn new(site: &Site) -> Self {
        Self::with_config(&site.blog_dir, &site.config)
    }

    /// Create a loader for an explicit blog directory
    pub fn with_config<P: AsRef<Path>>(blog_dir: P, config: &SiteConfig) -> Self {
        let exclude = config
            .blog
            .exclude
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!("Ignoring bad exclude pattern {:?}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            blog_dir: blog_dir.as_ref().to_path_buf(),
            options: config.blog.clone(),
            exclude,
            renderer: MarkdownRenderer::with_options(&config.highlight),
        }
    }

    pub fn blog_dir(&self) -> &Path {
        &self.blog_dir
    }

    /// Load every post in the blog directory, newest first
    ///
    /// A missing directory is an empty blog. Files that fail to load are
    /// logged and skipped. Drafts are dropped unless `render_drafts` is set.
    pub fn load_all(&self) -> Result<Vec<Post>> {
        if !self.blog_dir.is_dir() {
            tracing::debug!("No blog directory at {:?}", self.blog_dir);
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.blog_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| BlogError::Io {
                path: self.blog_dir.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && is_post_file(path) && !self.is_excluded(path) {
                files.push(path.to_path_buf());
            }
        }
        // `foo.md` sorts before `foo.mdx`, so the .md file wins a slug clash
        files.sort();

        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for path in files {
            let slug = slug_of(&path);
            if !seen.insert(slug.clone()) {
                tracing::warn!("Skipping {:?}: slug {:?} is already taken", path, slug);
                continue;
            }
            match self.load_file(&path) {
                Ok(post) => {
                    if !post.draft || self.options.render_drafts {
                        posts.push(post);
                    } else {
                        tracing::debug!("Skipping draft {:?}", path);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        posts.sort_by(newest_first);

        Ok(posts)
    }

    /// Load one post by slug, trying `<slug>.md` then `<slug>.mdx`
    ///
    /// Drafts are returned too; the caller addressed the post directly.
    pub fn load_by_slug(&self, slug: &str) -> Result<Post> {
        validate_slug(slug)?;

        for ext in POST_EXTENSIONS {
            let path = self.blog_dir.join(format!("{}.{}", slug, ext));
            if path.is_file() {
                return self.load_file(&path);
            }
        }

        Err(BlogError::NotFound {
            slug: slug.to_string(),
        })
    }

    /// Load a single post from a file
    pub fn load_file(&self, path: &Path) -> Result<Post> {
        let raw = fs::read_to_string(path).map_err(|source| BlogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|source| BlogError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

        let body = if has_extension(path, "mdx") {
            strip_mdx_module_lines(body)
        } else {
            body.to_string()
        };

        let slug = slug_of(path);
        let title = fm.title.clone().unwrap_or_default();
        let description = fm.description.clone().unwrap_or_default();

        let mut reading = reading_time(&body, self.options.words_per_minute);
        if let Some(text) = fm.read_time.as_deref().filter(|t| !t.trim().is_empty()) {
            reading = reading.with_text(text);
        }

        let excerpt = if description.trim().is_empty() {
            extract_excerpt(body.trim(), EXCERPT_LENGTH)
        } else {
            description.clone()
        };

        let mut post = Post::new(&slug, &title, path.to_path_buf());
        post.description = description;
        post.date = fm.parse_date();
        post.date_raw = fm.date.clone().unwrap_or_default();
        post.updated = fm.parse_updated();
        post.author = non_empty_or(fm.author, &self.options.default_author);
        post.category = non_empty_or(fm.category, &self.options.default_category);
        post.tags = fm
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        post.featured = fm.featured;
        post.draft = fm.draft;
        post.image = fm.image.map(|image| PostImage::from_ref(image, &title));
        post.reading_time = reading;
        post.html = self.renderer.render(&body);
        post.excerpt = excerpt;
        post.content = body;
        post.extra = fm.extra;

        if post.date.is_none() && !post.date_raw.is_empty() {
            tracing::warn!("Unrecognised date {:?} in {:?}", post.date_raw, path);
        }

        Ok(post)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        self.exclude.iter().any(|p| p.matches(name))
    }
}

/// Reject slugs that could escape the blog directory
fn validate_slug(slug: &str) -> Result<()> {
    let bad = slug.trim().is_empty()
        || slug.starts_with('.')
        || slug.contains(['/', '\\', '\0'])
        || slug.contains("..");
    if bad {
        return Err(BlogError::InvalidSlug {
            slug: slug.to_string(),
        });
    }
    Ok(())
}

fn slug_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Check if a file is a post source file
fn is_post_file(path: &Path) -> bool {
    POST_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
