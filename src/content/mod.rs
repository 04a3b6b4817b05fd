//! Content module - the blog pipeline: front-matter, reading time,
//! markdown rendering, loading and querying posts

mod blog;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod reading_time;

pub use blog::{Blog, TermCount};
pub use error::{BlogError, Result};
pub use frontmatter::{FrontMatter, FrontMatterError, ImageRef};
pub use loader::ContentLoader;
pub use markdown::{strip_mdx_module_lines, MarkdownRenderer};
pub use post::{newest_first, Post, PostImage};
pub use reading_time::{count_words, reading_time, ReadingTime};
