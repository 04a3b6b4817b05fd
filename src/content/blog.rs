//! In-memory blog index with the query operations pages are built from

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

use super::error::{BlogError, Result};
use super::loader::ContentLoader;
use super::post::{newest_first, Post};

/// A tag or category with the number of posts carrying it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TermCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// All published posts, newest first
#[derive(Debug, Clone, Default)]
pub struct Blog {
    posts: Vec<Post>,
    index: HashMap<String, usize>,
}

impl Blog {
    /// Build an index from posts in any order
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(newest_first);
        let index = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.slug.clone(), i))
            .collect();
        Self { posts, index }
    }

    /// Load every post through a content loader
    pub fn load(loader: &ContentLoader) -> Result<Self> {
        Ok(Self::new(loader.load_all()?))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Every post, newest first
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// The `n` newest posts
    pub fn recent(&self, n: usize) -> &[Post] {
        &self.posts[..n.min(self.posts.len())]
    }

    pub fn featured(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.featured).collect()
    }

    /// Posts whose category equals `category`, ignoring case
    pub fn by_category(&self, category: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.in_category(category)).collect()
    }

    /// Posts carrying `tag`, ignoring case
    pub fn by_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// Look a post up by slug
    pub fn get(&self, slug: &str) -> Result<&Post> {
        self.index
            .get(slug)
            .map(|&i| &self.posts[i])
            .ok_or_else(|| BlogError::NotFound {
                slug: slug.to_string(),
            })
    }

    /// The newer and older neighbours of a post, for in-post navigation
    pub fn neighbors(&self, slug: &str) -> (Option<&Post>, Option<&Post>) {
        match self.index.get(slug) {
            Some(&i) => {
                let newer = i.checked_sub(1).map(|j| &self.posts[j]);
                let older = self.posts.get(i + 1);
                (newer, older)
            }
            None => (None, None),
        }
    }

    /// Split posts into index pages of `per_page`
    ///
    /// An empty blog still has one (empty) page so the index renders.
    pub fn paginate(&self, per_page: usize) -> Vec<&[Post]> {
        if self.posts.is_empty() {
            return vec![&self.posts[..]];
        }
        self.posts.chunks(per_page.max(1)).collect()
    }

    /// Tags with post counts, most used first
    pub fn tags(&self) -> Vec<TermCount> {
        count_terms(self.posts.iter().flat_map(|p| p.tags.iter()))
    }

    /// Categories with post counts, most used first
    pub fn categories(&self) -> Vec<TermCount> {
        count_terms(self.posts.iter().map(|p| &p.category))
    }
}

/// Group names case-insensitively, keeping the first spelling seen
fn count_terms<'a>(names: impl Iterator<Item = &'a String>) -> Vec<TermCount> {
    let mut terms: IndexMap<String, TermCount> = IndexMap::new();

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        terms
            .entry(name.to_lowercase())
            .and_modify(|t| t.count += 1)
            .or_insert_with(|| TermCount {
                name: name.to_string(),
                slug: slug::slugify(name),
                count: 1,
            });
    }

    let mut terms: Vec<TermCount> = terms.into_values().collect();
    // Stable: equal counts keep first-seen (newest post) order
    terms.sort_by(|a, b| b.count.cmp(&a.count));
    terms
}
