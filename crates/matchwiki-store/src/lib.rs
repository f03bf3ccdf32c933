//! Page storage: the wiki behind a small trait, with an in-memory and a
//! MediaWiki Action API implementation.

mod error;
pub use error::StoreError;

mod memory;
pub use memory::{MemoryStore, WriteRecord};

#[cfg(feature = "mediawiki")]
mod mediawiki;
#[cfg(feature = "mediawiki")]
pub use mediawiki::{MediaWikiConfig, MediaWikiStore};

/// Read/write access to wiki pages by title.
///
/// Methods take `&mut self` so clients can keep session and rate-limit state.
pub trait PageStore {
    fn exists(&mut self, title: &str) -> Result<bool, StoreError>;

    /// Current wikitext of `title`. [`StoreError::PageNotFound`] if missing.
    fn read(&mut self, title: &str) -> Result<String, StoreError>;

    /// Replace the text of `title`, creating the page if needed.
    fn write(&mut self, title: &str, text: &str, summary: &str) -> Result<(), StoreError>;

    /// Titles of the pages in `category` (full title, namespace included).
    fn pages_in_category(&mut self, category: &str) -> Result<Vec<String>, StoreError>;

    /// Titles of the pages that transclude template `name` (no namespace prefix).
    fn pages_using_template(&mut self, name: &str) -> Result<Vec<String>, StoreError>;
}

impl<S: PageStore + ?Sized> PageStore for &mut S {
    fn exists(&mut self, title: &str) -> Result<bool, StoreError> {
        (**self).exists(title)
    }

    fn read(&mut self, title: &str) -> Result<String, StoreError> {
        (**self).read(title)
    }

    fn write(&mut self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        (**self).write(title, text, summary)
    }

    fn pages_in_category(&mut self, category: &str) -> Result<Vec<String>, StoreError> {
        (**self).pages_in_category(category)
    }

    fn pages_using_template(&mut self, name: &str) -> Result<Vec<String>, StoreError> {
        (**self).pages_using_template(name)
    }
}
