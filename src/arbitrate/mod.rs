//! Competing-output arbitration.
//!
//! Decides whether this crate owns structured data for the page and, if it
//! does, silences other emitters:
//!
//! - [`Arbitrator::enable`] hands the host the overrides for every known
//!   emitter extension point
//! - output written between [`Arbitrator::begin`] and [`Arbitrator::flush`]
//!   is buffered and stripped of foreign JSON-LD on flush
//!
//! # Scopes
//!
//! | Scope      | Opened                  | Active when                    |
//! |------------|-------------------------|--------------------------------|
//! | `Head`     | before the head segment | `arbitration.head_scope`       |
//! | `Document` | before any output       | `debug` and `document_scope`   |
//!
//! Writes go to the innermost open buffer; a flushed head buffer feeds the
//! document buffer when that one is still open.

mod emitters;
mod strip;

pub use emitters::{Override, known_emitters};
pub use strip::Stripper;

use crate::{
    config::{Priority, SiteConfig},
    context::PageContext,
    log,
};
use thiserror::Error;

/// Arbitration errors
#[derive(Debug, Error)]
pub enum ArbitrationError {
    #[error("invalid strip pattern `{0}`")]
    Pattern(String, #[source] regex::Error),
}

/// Output buffering scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferScope {
    Head,
    Document,
}

/// Per-render arbitration state.
#[derive(Debug)]
pub struct Arbitrator {
    owner: bool,
    head_scope: bool,
    document_scope: bool,
    stripper: Stripper,
    enabled: bool,
    overrides: Vec<Override>,
    head: Option<String>,
    document: Option<String>,
}

impl Arbitrator {
    /// State for one page render.
    pub fn new(config: &SiteConfig, ctx: &PageContext) -> Result<Self, ArbitrationError> {
        let arbitration = &config.arbitration;
        Ok(Self {
            owner: owns_output(config, ctx),
            head_scope: arbitration.head_scope,
            document_scope: arbitration.document_scope_active(),
            stripper: Stripper::new(arbitration.strip_patterns.as_slice())?,
            enabled: false,
            overrides: Vec::new(),
            head: None,
            document: None,
        })
    }

    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Registered overrides, empty while disabled.
    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    /// Register the emitter overrides. A no-op when already enabled or when
    /// another emitter owns the page.
    pub fn enable(&mut self) -> &[Override] {
        if self.owner && !self.enabled {
            self.overrides = known_emitters();
            self.enabled = true;
        }
        &self.overrides
    }

    /// Clear overrides and close every scope, returning the flushed text of
    /// any buffer still open.
    pub fn disable(&mut self) -> String {
        let mut out = String::new();
        if self.head.is_some() {
            out.push_str(&self.flush(BufferScope::Head));
        }
        if self.document.is_some() {
            out.push_str(&self.flush(BufferScope::Document));
        }
        self.overrides.clear();
        self.enabled = false;
        out
    }

    /// Open a buffer; returns whether the scope is now buffering.
    pub fn begin(&mut self, scope: BufferScope) -> bool {
        if !self.enabled || !self.scope_active(scope) {
            return false;
        }
        self.slot(scope).get_or_insert_with(String::new);
        true
    }

    /// Buffer `text` in the innermost open scope; unbuffered text passes
    /// through unchanged.
    pub fn write(&mut self, text: &str) -> String {
        match (&mut self.head, &mut self.document) {
            (Some(buffer), _) | (None, Some(buffer)) => {
                buffer.push_str(text);
                String::new()
            }
            (None, None) => text.to_owned(),
        }
    }

    /// Close a scope and release its stripped contents.
    pub fn flush(&mut self, scope: BufferScope) -> String {
        let Some(buffer) = self.slot(scope).take() else {
            return String::new();
        };
        let (text, removed) = self.stripper.strip(&buffer);
        if removed > 0 {
            log!("arbitrate"; "removed {} foreign JSON-LD block(s)", removed);
        }

        match (scope, &mut self.document) {
            (BufferScope::Head, Some(document)) => {
                document.push_str(&text);
                String::new()
            }
            _ => text,
        }
    }

    /// Strip text outside of any scope.
    pub fn strip(&self, html: &str) -> String {
        self.stripper.strip(html).0
    }

    fn scope_active(&self, scope: BufferScope) -> bool {
        match scope {
            BufferScope::Head => self.head_scope,
            BufferScope::Document => self.document_scope,
        }
    }

    fn slot(&mut self, scope: BufferScope) -> &mut Option<String> {
        match scope {
            BufferScope::Head => &mut self.head,
            BufferScope::Document => &mut self.document,
        }
    }
}

/// Whether this crate emits structured data for the page.
pub fn owns_output(config: &SiteConfig, ctx: &PageContext) -> bool {
    config.priority_for(ctx) == Priority::Own
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentOverride;

    const OWNED: &str =
        r#"<script type="application/ld+json" data-schemagraph="owned">{}</script>"#;
    const FOREIGN: &str = r#"<script type="application/ld+json">{"@type":"Thing"}</script>"#;

    fn ctx() -> PageContext {
        PageContext {
            post_type: Some("post".into()),
            ..Default::default()
        }
    }

    fn arbitrator(config: &SiteConfig) -> Arbitrator {
        Arbitrator::new(config, &ctx()).unwrap()
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut arb = arbitrator(&SiteConfig::default());
        let first = arb.enable().to_vec();
        let second = arb.enable().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), known_emitters().len());

        arb.disable();
        assert!(arb.overrides().is_empty());
        assert!(!arb.is_enabled());
    }

    #[test]
    fn test_external_priority_registers_nothing() {
        let mut config = SiteConfig::default();
        config.content.insert(
            "post".into(),
            ContentOverride {
                priority: Some(Priority::External),
                ..Default::default()
            },
        );
        let mut arb = arbitrator(&config);
        assert!(!arb.is_owner());
        assert!(arb.enable().is_empty());
        assert!(!arb.begin(BufferScope::Head));
        assert_eq!(arb.write(FOREIGN), FOREIGN);
    }

    #[test]
    fn test_head_scope_strips_on_flush() {
        let mut arb = arbitrator(&SiteConfig::default());
        arb.enable();
        assert!(arb.begin(BufferScope::Head));
        assert_eq!(arb.write(FOREIGN), "");
        assert_eq!(arb.write(OWNED), "");
        assert_eq!(arb.flush(BufferScope::Head), OWNED);
        // closed scope passes text through
        assert_eq!(arb.write("<p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_document_scope_requires_debug() {
        let mut config = SiteConfig::default();
        config.arbitration.document_scope = true;
        let mut arb = arbitrator(&config);
        arb.enable();
        assert!(!arb.begin(BufferScope::Document));

        config.arbitration.debug = true;
        let mut arb = arbitrator(&config);
        arb.enable();
        assert!(arb.begin(BufferScope::Document));
    }

    #[test]
    fn test_nested_scopes() {
        let mut config = SiteConfig::default();
        config.arbitration.document_scope = true;
        config.arbitration.debug = true;
        let mut arb = arbitrator(&config);
        arb.enable();

        arb.begin(BufferScope::Document);
        arb.write("<html>");
        arb.begin(BufferScope::Head);
        arb.write(FOREIGN);
        assert_eq!(arb.flush(BufferScope::Head), "");
        arb.write(&format!("<body>{FOREIGN}</body></html>"));
        assert_eq!(arb.flush(BufferScope::Document), "<html><body></body></html>");
    }

    #[test]
    fn test_disable_flushes_open_buffers() {
        let mut config = SiteConfig::default();
        config.arbitration.document_scope = true;
        config.arbitration.debug = true;
        let mut arb = arbitrator(&config);
        arb.enable();

        arb.begin(BufferScope::Document);
        arb.write("<html>");
        arb.begin(BufferScope::Head);
        arb.write(&format!("<head>{FOREIGN}{OWNED}</head>"));

        let out = arb.disable();
        assert_eq!(out, format!("<html><head>{OWNED}</head>"));
        assert!(!arb.is_enabled());
        assert_eq!(arb.write("tail"), "tail");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = SiteConfig::default();
        config.arbitration.strip_patterns = vec!["[".into()];
        assert!(Arbitrator::new(&config, &ctx()).is_err());
    }
}
