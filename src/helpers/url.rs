//! URL helper functions

use crate::config::SiteConfig;

/// Whether a link points off-site (absolute URL, mail or phone link)
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("mailto:")
        || path.starts_with("tel:")
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/site/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) || path.starts_with('#') {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Whether a navigation item should be marked active for the current page
///
/// Home only matches itself; other sections also match their sub-pages, so
/// `/blog/some-post/` keeps "Blog" highlighted.
pub fn is_active(item_path: &str, current_path: &str) -> bool {
    let item = item_path.split('#').next().unwrap_or(item_path);
    if item == "/" {
        return current_path == "/";
    }
    current_path.starts_with(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/site/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/site/about/");
        assert_eq!(url_for(&config, ""), "/site/");
        assert_eq!(url_for(&config, "tel:1-800-346-3365"), "tel:1-800-346-3365");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/site/about/"
        );
    }

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/blog/"));
        assert!(is_active("/blog/", "/blog/welcome/"));
        assert!(!is_active("/about/", "/blog/"));
    }
}
