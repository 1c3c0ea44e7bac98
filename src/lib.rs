//! schemagraph - schema.org JSON-LD graph compiler for content-managed sites.
//!
//! One page render produces one connected `@graph`:
//!
//! ```text
//! SiteConfig + PageContext + Sources
//!         │
//!         ▼
//!   schema::build ──► validate ──► emit::script_tag
//!         │
//!         └── breadcrumb::resolve_trail
//!
//! arbitrate::Arbitrator    strips competing JSON-LD from buffered output
//! diagnostic::evaluate     judges rendered text: presence, validity, quality
//! ```

pub mod arbitrate;
pub mod breadcrumb;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod emit;
pub mod logger;
pub mod schema;
pub mod source;
pub mod utils;
pub mod validate;

pub use config::SiteConfig;
pub use context::{PageContext, PageKind};
pub use schema::{Graph, build};
pub use source::Sources;
pub use validate::{ValidationResult, validate};
