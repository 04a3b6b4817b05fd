//! Front-matter parsing

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::helpers::parse_date_string;

/// Errors for front-matter that is present but cannot be read
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unterminated JSON front-matter")]
    UnterminatedJson,
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Cover image: either a bare path or `{ src, alt }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ImageRef {
    Path(String),
    Detailed {
        src: String,
        #[serde(default)]
        alt: String,
    },
}

/// Front-matter data from a blog post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "pubDate")]
    pub date: Option<String>,
    #[serde(alias = "updatedDate")]
    pub updated: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub featured: bool,
    pub draft: bool,
    pub image: Option<ImageRef>,
    /// Explicit reading time text, overrides the computed value
    #[serde(rename = "readTime", alias = "read_time")]
    pub read_time: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = skip_blank_lines(content.trim_start_matches('\u{feff}'));

        // YAML front-matter (---)
        if content.starts_with("---") {
            return Ok(Self::parse_yaml(content));
        }

        // JSON front-matter (;;; or {"key":)
        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        // An empty block closes immediately
        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else if let Some(end_pos) = rest.find("\n---") {
            (&rest[..end_pos], &rest[end_pos + 4..])
        } else {
            // No closing ---, treat as no front-matter
            return (FrontMatter::default(), content);
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A `---` thematic break followed by prose is not front-matter: require
        // at least one `key: value` line
        let has_yaml_structure = yaml_content.lines().any(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return false;
            }
            if let Some(colon_pos) = trimmed.find(':') {
                let before_colon = &trimmed[..colon_pos];
                let is_valid_key = !before_colon.is_empty()
                    && before_colon
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                    && before_colon != "http"
                    && before_colon != "https"
                    && before_colon != "ftp";
                if is_valid_key {
                    let after_colon = &trimmed[colon_pos + 1..];
                    return after_colon.is_empty() || after_colon.starts_with(' ');
                }
            }
            false
        });

        if !has_yaml_structure {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::UnterminatedJson)?;
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            let fm: FrontMatter = serde_json::from_str(json_content)?;
            return Ok((fm, remaining));
        }

        // A JSON object at the start, up to its matching closing brace
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;
        let mut end_pos = None;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end_pos = end_pos.ok_or(FrontMatterError::UnterminatedJson)?;
        let json_content = &content[..end_pos];
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
        let fm: FrontMatter = serde_json::from_str(json_content)?;

        Ok((fm, remaining))
    }

    /// Parse the date string
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }

    /// Parse the updated date string
    pub fn parse_updated(&self) -> Option<NaiveDateTime> {
        self.updated.as_deref().and_then(parse_date_string)
    }
}

/// Drop leading whitespace-only lines, keeping the indentation of the
/// first line with content
fn skip_blank_lines(content: &str) -> &str {
    let mut rest = content;
    while let Some(pos) = rest.find('\n') {
        if !rest[..pos].trim().is_empty() {
            break;
        }
        rest = &rest[pos + 1..];
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Protecting Your Hogan
description: Coverage for traditional homes
date: 2024-01-15
author: Lena Begay
category: Homeowners
tags:
  - home
  - tradition
featured: true
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Protecting Your Hogan"));
        assert_eq!(fm.author.as_deref(), Some("Lena Begay"));
        assert_eq!(fm.category.as_deref(), Some("Homeowners"));
        assert_eq!(fm.tags, vec!["home", "tradition"]);
        assert!(fm.featured);
        assert!(!fm.draft);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_astro_field_names() {
        let content = r#"---
title: Winter Driving
pubDate: 2024-02-01
updatedDate: 2024-03-01
readTime: 4 min read
image:
  src: /images/snow.jpg
  alt: Snowy road
---
Body
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.date.as_deref(), Some("2024-02-01"));
        assert!(fm.parse_updated().is_some());
        assert_eq!(fm.read_time.as_deref(), Some("4 min read"));
        assert_eq!(
            fm.image,
            Some(ImageRef::Detailed {
                src: "/images/snow.jpg".to_string(),
                alt: "Snowy road".to_string()
            })
        );
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "tags": ["a", "b"]}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test {Post}"));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_unterminated_json_is_an_error() {
        assert!(matches!(
            FrontMatter::parse(";;;{\"title\": \"x\"}"),
            Err(FrontMatterError::UnterminatedJson)
        ));
    }

    #[test]
    fn test_single_string_tags_and_extra_fields() {
        let content = r#"---
title: Single Tag Post
tags: Auto
seo_weight: 3
---
Content here.
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Auto"]);
        assert!(fm.extra.contains_key("seo_weight"));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some text with a list:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just markdown").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "# Just markdown");
    }

    #[test]
    fn test_malformed_yaml_is_body() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(fm.tags.is_empty());
        assert!(remaining.starts_with("---\ntitle: [unclosed\n---"));
        assert!(remaining.ends_with("Body"));
    }

    #[test]
    fn test_leading_indentation_kept() {
        let content = "\n  \n    let premium = 120;\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "    let premium = 120;\n");

        let (_, remaining) = FrontMatter::parse("\u{feff}\n---\ntitle: Hi\n---\nBody").unwrap();
        assert_eq!(remaining, "Body");
    }
}
