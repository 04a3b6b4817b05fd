//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::{BuildReport, Generator};
use crate::{Site, CONFIG_FILE};

/// Generate the static site
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    // Load content
    let blog = site.load_blog()?;
    tracing::info!("Loaded {} posts", blog.len());

    // Generate site
    let generator = Generator::new(site)?;
    let report = generator.generate(&blog)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages ({} posts, {} tags, {} categories, {} static files) in {:.2}s",
        report.pages,
        report.posts,
        report.tags,
        report.categories,
        report.assets,
        duration.as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate
///
/// The config file is re-read on every rebuild so edits to `site.yml`
/// take effect without a restart.
pub async fn watch(site: &Site) -> Result<()> {
    let site = site.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&site, WATCH_DEBOUNCE)).await?
}

/// Quiet period after the last change before a rebuild starts
const WATCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Rebuild after every burst of changes until the watcher goes away
///
/// Changes that land while a rebuild is running are queued by the
/// debouncer and trigger one more rebuild.
fn watch_blocking(site: &Site, debounce: Duration) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(debounce, tx)?;

    // Watch content and static directories
    for dir in [&site.content_dir, &site.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
        }
    }

    // Watch config file
    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Keep a --drafts override across config reloads
    let render_drafts = site.config.blog.render_drafts;

    for result in rx {
        match result {
            Ok(events) => {
                for event in &events {
                    tracing::debug!("Changed: {:?}", event.path);
                }
                tracing::info!("File changed, regenerating...");
                if let Err(e) = rebuild(&site.base_dir, render_drafts) {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Re-read the site from disk and generate it
fn rebuild(base_dir: &Path, render_drafts: bool) -> Result<BuildReport> {
    let mut site = Site::new(base_dir)?;
    site.config.blog.render_drafts |= render_drafts;
    run(&site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;
    use tempfile::TempDir;

    fn post(title: &str) -> String {
        format!("---\ntitle: {}\ndate: 2024-05-01\n---\n\nBody text.\n", title)
    }

    #[test]
    fn test_run_reports_counts() {
        let tmp = TempDir::new().unwrap();
        let blog_dir = tmp.path().join("content/blog");
        fs::create_dir_all(&blog_dir).unwrap();
        fs::write(blog_dir.join("first.md"), post("First")).unwrap();

        let site = Site::new(tmp.path()).unwrap();
        let report = run(&site).unwrap();
        assert_eq!(report.posts, 1);
        assert!(tmp.path().join("public/blog/first/index.html").exists());
    }

    #[test]
    fn test_watch_builds_last_edit_of_a_burst() {
        let tmp = TempDir::new().unwrap();
        let blog_dir = tmp.path().join("content/blog");
        fs::create_dir_all(&blog_dir).unwrap();

        let site = Site::new(tmp.path()).unwrap();
        run(&site).unwrap();

        let watched = site.clone();
        std::thread::spawn(move || watch_blocking(&watched, Duration::from_millis(200)));
        std::thread::sleep(Duration::from_millis(300));

        let source = blog_dir.join("x.md");
        fs::write(&source, post("Version One")).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        fs::write(&source, post("Version Two")).unwrap();

        let page = tmp.path().join("public/blog/x/index.html");
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut html = String::new();
        while Instant::now() < deadline {
            html = fs::read_to_string(&page).unwrap_or_default();
            if html.contains("Version Two") {
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        assert!(
            html.contains("<title>Version Two | "),
            "page was not rebuilt from the last edit: {}",
            html
        );
    }
}
