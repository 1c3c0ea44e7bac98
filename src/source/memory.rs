//! In-memory content store loaded from a JSON fixture.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "context": { "kind": "singular", "post_id": 2, "title": "Child", "url": "https://acme.example/parent/child/" },
//!   "posts":   [ { "id": 1, "title": "Parent", "url": "https://acme.example/parent/" },
//!                { "id": 2, "title": "Child", "url": "https://acme.example/parent/child/", "parent": 1 } ],
//!   "terms":   [],
//!   "images":  [ { "id": 10, "url": "https://acme.example/logo.png", "width": 600, "height": 60 } ],
//!   "archive": [],
//!   "products": [ { "post_id": 2, "price": "1200", "currency": "JPY" } ]
//! }
//! ```

use super::{
    ArchiveItem, CommerceAdapter, ContentStore, ImageMeta, Post, ProductFields, Term,
};
use crate::context::PageContext;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Fixture loading errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Fixture parsing error")]
    Json(#[from] serde_json::Error),
}

/// Image record with its attachment id.
#[derive(Debug, Clone, Deserialize)]
struct ImageRecord {
    id: u64,
    #[serde(flatten)]
    meta: ImageMeta,
}

/// Product record keyed by post id.
#[derive(Debug, Clone, Deserialize)]
struct ProductRecord {
    post_id: u64,
    #[serde(flatten)]
    fields: ProductFields,
}

/// Serialized render input: page context plus the content it refers to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub context: PageContext,
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    terms: Vec<Term>,
    #[serde(default)]
    images: Vec<ImageRecord>,
    #[serde(default)]
    archive: Vec<ArchiveItem>,
    #[serde(default)]
    products: Vec<ProductRecord>,
}

impl Fixture {
    /// Parse a fixture from JSON text
    pub fn from_str(content: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a fixture from file path
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let content =
            fs::read_to_string(path).map_err(|err| FixtureError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Split into the page context and an indexed store.
    pub fn into_parts(self) -> (PageContext, MemoryStore) {
        let store = MemoryStore {
            posts: self.posts.into_iter().map(|p| (p.id, p)).collect(),
            terms: self.terms.into_iter().map(|t| (t.id, t)).collect(),
            images: self.images.into_iter().map(|i| (i.id, i.meta)).collect(),
            products: self.products.into_iter().map(|p| (p.post_id, p.fields)).collect(),
            archive: self.archive,
        };
        (self.context, store)
    }
}

/// Indexed content held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: FxHashMap<u64, Post>,
    terms: FxHashMap<u64, Term>,
    images: FxHashMap<u64, ImageMeta>,
    products: FxHashMap<u64, ProductFields>,
    archive: Vec<ArchiveItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_post(&mut self, post: Post) {
        self.posts.insert(post.id, post);
    }

    pub fn insert_term(&mut self, term: Term) {
        self.terms.insert(term.id, term);
    }

    pub fn insert_image(&mut self, id: u64, image: ImageMeta) {
        self.images.insert(id, image);
    }

    pub fn insert_product(&mut self, post_id: u64, fields: ProductFields) {
        self.products.insert(post_id, fields);
    }

    pub fn push_archive_item(&mut self, item: ArchiveItem) {
        self.archive.push(item);
    }
}

impl ContentStore for MemoryStore {
    fn post(&self, id: u64) -> Option<Post> {
        self.posts.get(&id).cloned()
    }

    fn term(&self, id: u64) -> Option<Term> {
        self.terms.get(&id).cloned()
    }

    /// The fixture holds a single listing, whatever the context.
    fn archive_items(&self, _ctx: &PageContext) -> Vec<ArchiveItem> {
        self.archive.clone()
    }

    fn image(&self, id: u64) -> Option<ImageMeta> {
        self.images.get(&id).cloned()
    }
}

impl CommerceAdapter for MemoryStore {
    fn product(&self, post_id: u64) -> Option<ProductFields> {
        self.products.get(&post_id).cloned()
    }
}
