//! Builds a complete site into a temporary directory and checks the output

use std::fs;
use std::path::Path;

use broker_press::Site;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join("public").join(rel))
        .unwrap_or_else(|e| panic!("missing {}: {}", rel, e))
}

fn sample_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        root,
        "site.yml",
        "title: Diné Insurance\nurl: https://example.org\nblog:\n  per_page: 2\n",
    );
    write(
        root,
        "content/blog/hogan-coverage.md",
        r#"---
title: "Insuring Your Hogan"
description: What homeowners coverage means for traditional homes.
date: 2024-03-02
category: Homeowners
tags: [home, tradition]
featured: true
image:
  src: /images/hogan.jpg
  alt: A hogan at sunrise
---

## Why it matters

Your hogan holds family history.

```rust
fn main() {}
```
"#,
    );
    write(
        root,
        "content/blog/winter-driving.mdx",
        r#"---
title: Winter Driving on Reservation Roads
pubDate: 2024-01-10
category: Auto
tags: [safety]
readTime: 4 min read
---
import Callout from '../components/Callout.astro'

Chains, blankets, and water belong in every truck.
"#,
    );
    write(
        root,
        "content/blog/fleet-basics.md",
        ";;;\n{\"title\": \"Fleet Insurance Basics\", \"date\": \"2023-09-01\", \"tags\": [\"safety\", \"business\"]}\n;;;\nCommercial auto for small fleets.\n",
    );
    write(
        root,
        "content/blog/unfinished.md",
        "---\ntitle: Not Ready\ndraft: true\n---\nSecret.\n",
    );
    write(root, "static/images/hogan.jpg", "jpeg bytes");

    tmp
}

#[test]
fn builds_every_page() {
    let tmp = sample_site();
    let site = Site::new(tmp.path()).unwrap();
    let report = site.generate().unwrap();

    assert_eq!(report.posts, 3);
    assert_eq!(report.assets, 1);
    // tags: home, tradition, safety, business; categories: Homeowners, Auto, Insurance
    assert_eq!(report.tags, 4);
    assert_eq!(report.categories, 3);

    for rel in [
        "index.html",
        "services/index.html",
        "about/index.html",
        "contact/index.html",
        "contact/thanks/index.html",
        "blog/index.html",
        "blog/page/2/index.html",
        "blog/hogan-coverage/index.html",
        "blog/winter-driving/index.html",
        "blog/fleet-basics/index.html",
        "blog/tags/safety/index.html",
        "blog/category/homeowners/index.html",
        "404.html",
        "atom.xml",
        "sitemap.xml",
        "robots.txt",
        "search.json",
        "images/hogan.jpg",
    ] {
        assert!(tmp.path().join("public").join(rel).is_file(), "{}", rel);
    }

    assert!(!tmp.path().join("public/blog/unfinished").exists());
}

#[test]
fn post_page_content() {
    let tmp = sample_site();
    Site::new(tmp.path()).unwrap().generate().unwrap();

    let html = read(tmp.path(), "blog/hogan-coverage/index.html");
    assert!(html.contains("<title>Insuring Your Hogan | Diné Insurance</title>"));
    assert!(html.contains("March 2, 2024"));
    assert!(html.contains("Homeowners"));
    assert!(html.contains(r#"id="why-it-matters""#));
    assert!(html.contains(r##"href="#why-it-matters""##));
    assert!(html.contains(r#"<meta property="og:image" content="https://example.org/images/hogan.jpg">"#));
    assert!(html.contains("A hogan at sunrise"));
    // Older neighbour
    assert!(html.contains("/blog/winter-driving/"));

    let mdx = read(tmp.path(), "blog/winter-driving/index.html");
    assert!(mdx.contains("4 min read"));
    assert!(!mdx.contains("import Callout"));
}

#[test]
fn blog_index_and_home() {
    let tmp = sample_site();
    Site::new(tmp.path()).unwrap().generate().unwrap();

    let index = read(tmp.path(), "blog/index.html");
    assert!(index.contains("Featured Articles"));
    assert!(index.contains("Insuring Your Hogan"));
    assert!(index.contains("/blog/page/2/"));

    let page2 = read(tmp.path(), "blog/page/2/index.html");
    assert!(page2.contains("Fleet Insurance Basics"));
    assert!(!page2.contains("Featured Articles"));

    let home = read(tmp.path(), "index.html");
    assert!(!home.contains(r#"<a href="/blog/" class="active""#));
    assert!(home.contains(r#"<a href="/" class="active" aria-current="page">Home</a>"#));
    assert!(home.contains("Winter Driving on Reservation Roads"));
}

#[test]
fn feeds_and_indexes() {
    let tmp = sample_site();
    Site::new(tmp.path()).unwrap().generate().unwrap();

    let feed = read(tmp.path(), "atom.xml");
    assert_eq!(feed.matches("<entry>").count(), 3);
    assert!(feed.contains("<link href=\"https://example.org/atom.xml\" rel=\"self\"/>"));

    let search: serde_json::Value =
        serde_json::from_str(&read(tmp.path(), "search.json")).unwrap();
    let slugs: Vec<&str> = search
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["hogan-coverage", "winter-driving", "fleet-basics"]);

    let sitemap = read(tmp.path(), "sitemap.xml");
    assert!(sitemap.contains("<loc>https://example.org/blog/fleet-basics/</loc>"));
    assert!(!sitemap.contains("unfinished"));
}

#[test]
fn drafts_build_when_enabled() {
    let tmp = sample_site();
    let mut site = Site::new(tmp.path()).unwrap();
    site.config.blog.render_drafts = true;
    let report = site.generate().unwrap();

    assert_eq!(report.posts, 4);
    assert!(tmp.path().join("public/blog/unfinished/index.html").is_file());
}

#[test]
fn clean_removes_output() {
    let tmp = sample_site();
    let site = Site::new(tmp.path()).unwrap();
    site.generate().unwrap();
    site.clean().unwrap();
    assert!(!tmp.path().join("public").exists());
}
