//! Helper functions shared by the content pipeline, the generator and the
//! template filters.

mod date;
mod html;
mod text;
mod toc;
mod url;

pub use date::*;
pub use html::*;
pub use text::*;
pub use toc::*;
pub use url::*;
