//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn language() -> String {
        "en-US".into()
    }

    pub fn utc_offset() -> String {
        "+00:00".into()
    }
}

// ============================================================================
// [schema] Section Defaults
// ============================================================================

pub mod schema {
    use super::super::SchemaType;

    pub fn default_type() -> SchemaType {
        SchemaType::WebPage
    }

    pub fn faq_question_class() -> String {
        "faq-question".into()
    }

    pub fn faq_answer_class() -> String {
        "faq-answer".into()
    }
}

// ============================================================================
// [breadcrumb] Section Defaults
// ============================================================================

pub mod breadcrumb {
    pub fn home_label() -> String {
        "Home".into()
    }
}

// ============================================================================
// [arbitration] Section Defaults
// ============================================================================

pub mod arbitration {
    use super::super::Priority;

    pub fn priority() -> Priority {
        Priority::default()
    }
}
