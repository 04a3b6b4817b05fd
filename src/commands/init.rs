//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# broker-press site configuration
# Every key is optional; missing keys fall back to built-in defaults.

# Site
title: Diné Insurance
tagline: Protecting What Matters. Honoring Who You Are.
description: >-
  Trusted, culturally respectful insurance solutions for the Diné people,
  preserving family, land, and livelihood through personalized service
  rooted in Navajo values.
author: Diné Insurance
language: en
locale: en_US
timezone: America/Phoenix

# URL
url: https://dine-insurance.netlify.app
root: /

# Contact details
phone: 1-800-346-3365
phone_display: 1-800-DINE-365
email: protect@dineinsurance.com
service_area: Serving Navajo Nation and surrounding communities

# Directory
content_dir: content
static_dir: static
public_dir: public

# Blog
blog:
  dir: blog
  per_page: 6
  featured_limit: 3
  home_limit: 3
  words_per_minute: 200
  default_author: Diné Insurance Team
  default_category: Insurance
  render_drafts: false
  exclude: []
  feed_limit: 20
  toc_depth: 3

# Code highlighting
highlight:
  enable: true
  theme: InspiredGitHub
  line_number: false

# Quote form
contact:
  form_action: /contact
  thanks_path: /contact/thanks/
"#;

const STYLESHEET: &str = r#":root {
  --turquoise: #0f766e;
  --sand: #f5efe6;
  --earth: #7c4a2d;
  --ink: #1f2933;
}

* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: var(--ink); line-height: 1.6; }
a { color: var(--turquoise); }
.container { max-width: 72rem; margin: 0 auto; padding: 0 1.25rem; }
.site-header__inner, .site-header__actions, .site-nav ul { display: flex; gap: 1rem; align-items: center; }
.site-header__inner { justify-content: space-between; padding-block: 1rem; }
.site-nav ul { list-style: none; margin: 0; padding: 0; }
.site-nav a.active { font-weight: 700; border-bottom: 2px solid var(--turquoise); }
.button { display: inline-block; padding: 0.6rem 1.2rem; border-radius: 0.4rem; text-decoration: none; }
.button--primary { background: var(--turquoise); color: #fff; }
.button--secondary { border: 2px solid var(--turquoise); }
.hero, .page-hero, .cta { background: var(--sand); padding-block: 3rem; }
.card-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fit, minmax(16rem, 1fr)); }
.post-card, .service-card, .value-card, .contact-method, .office { border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 1.25rem; }
.post-card__image img, .post__image img { width: 100%; height: auto; }
.post__layout { display: grid; gap: 2rem; grid-template-columns: minmax(0, 1fr); }
.post__content pre { overflow-x: auto; padding: 1rem; }
.quote-form form { display: grid; gap: 0.75rem; max-width: 40rem; }
.site-footer { background: var(--ink); color: #fff; padding-block: 2rem; margin-top: 3rem; }
.site-footer a { color: #fff; }
.site-footer__grid { display: grid; gap: 2rem; grid-template-columns: repeat(auto-fit, minmax(12rem, 1fr)); }
"#;

/// Initialize a new site in the given directory
///
/// Refuses to run where a site configuration already exists.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("content/blog"))
        .with_context(|| format!("Failed to create site in {:?}", target_dir))?;
    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join("static/css/site.css"), STYLESHEET)?;

    // Create a sample post
    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Welcome to Our Insurance Blog
description: Tips, guides, and community news to help you protect what matters most.
date: {}
author: Diné Insurance Team
category: Community
tags: [welcome, community]
featured: true
---

Yá'át'ééh! Welcome to the Diné Insurance blog.

## What you'll find here

- Plain-language guides to homeowners, auto, business, and life coverage
- Seasonal safety tips for life on the Navajo Nation
- News from our Window Rock, Shiprock, and Chinle offices

## Writing a new post

```bash
broker-press new "My New Post" --category Auto --tag safety
```

Then run `broker-press server` and open the blog to preview it.
"#,
        today
    );

    fs::write(target_dir.join("content/blog/welcome.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.config.title, "Diné Insurance");
        assert_eq!(site.config.blog.per_page, 6);
        // Sections left out of the template keep their defaults
        assert_eq!(site.config.services.len(), 4);

        let blog = site.load_blog().unwrap();
        assert_eq!(blog.len(), 1);
        let post = blog.get("welcome").unwrap();
        assert!(post.featured);
        assert_eq!(post.category, "Community");
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        assert!(init_site(tmp.path()).is_err());
    }
}
