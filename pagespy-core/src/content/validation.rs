//! Content validation
//!
//! Schema and semantic checks on a deserialized [`SiteContent`]. Validation
//! collects every issue rather than stopping at the first one so a content
//! author sees the whole picture in a single run.

use std::collections::HashSet;

use crate::content::model::SiteContent;
use crate::error::{Severity, ValidationIssue};
use crate::render::page::SHELL_IDS;
use crate::render::phase_ids;
use crate::spy::observer::Thresholds;

// ============================================================================
// Public API
// ============================================================================

/// Result of content validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Content validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates site content and returns the result.
    pub fn validate(&mut self, content: &SiteContent) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_site(content);
        self.validate_nav(content);
        self.validate_modules(content);
        self.validate_roadmap(content);
        self.validate_tracker(content);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn validate_site(&mut self, content: &SiteContent) {
        if content.site.title.trim().is_empty() {
            self.add_warning("site.title", "title is empty");
        }

        let default = &content.site.default_section;
        let known = content.nav.iter().any(|n| &n.id == default)
            || content.modules.iter().any(|m| &m.dom_id() == default);
        if !known {
            self.add_warning(
                "site.default_section",
                &format!("'{default}' is not a navigation section; nothing will be highlighted initially"),
            );
        }
    }

    fn validate_nav(&mut self, content: &SiteContent) {
        let phases = phase_ids(&content.roadmap);
        let mut seen = HashSet::new();
        for (i, entry) in content.nav.iter().enumerate() {
            let path = format!("nav[{i}].id");
            if !is_fragment_safe(&entry.id) {
                self.add_error(
                    &path,
                    &format!("'{}' is not a URL-fragment-safe identifier", entry.id),
                );
            }
            if !seen.insert(entry.id.as_str()) {
                self.add_warning(&path, &format!("duplicate navigation id '{}'", entry.id));
            }
            if content.modules.iter().any(|m| m.dom_id() == entry.id) {
                self.add_warning(
                    &path,
                    &format!("'{}' collides with a module block identifier", entry.id),
                );
            }
            if SHELL_IDS.contains(&entry.id.as_str()) {
                self.add_warning(
                    &path,
                    &format!("'{}' collides with a page shell element", entry.id),
                );
            }
            if phases.contains(&entry.id) {
                self.add_warning(
                    &path,
                    &format!("'{}' collides with a roadmap phase identifier", entry.id),
                );
            }
            if entry.label.trim().is_empty() {
                self.add_warning(&format!("nav[{i}].label"), "label is empty");
            }
        }
    }

    fn validate_modules(&mut self, content: &SiteContent) {
        let mut seen = HashSet::new();
        for (i, module) in content.modules.iter().enumerate() {
            let path = format!("modules[{i}].id");
            if module.id.is_empty() {
                self.add_error(&path, "module id is required and cannot be empty");
            } else if !is_fragment_safe(&module.id) {
                self.add_error(
                    &path,
                    &format!("'{}' is not a URL-fragment-safe identifier", module.id),
                );
            }
            if !module.id.is_empty() && !seen.insert(module.id.as_str()) {
                self.add_error(&path, &format!("duplicate module id '{}'", module.id));
            }
            if module.name.trim().is_empty() {
                self.add_warning(&format!("modules[{i}].name"), "name is empty");
            }
        }
    }

    fn validate_roadmap(&mut self, content: &SiteContent) {
        let mut seen = HashSet::new();
        for (i, phase) in content.roadmap.iter().enumerate() {
            if phase.phase.trim().is_empty() {
                self.add_warning(&format!("roadmap[{i}].phase"), "phase title is empty");
            } else if !seen.insert(phase.phase.as_str()) {
                self.add_warning(
                    &format!("roadmap[{i}].phase"),
                    &format!("duplicate phase title '{}'; its block id gets a suffix", phase.phase),
                );
            }
            if phase.items.is_empty() {
                self.add_warning(&format!("roadmap[{i}].items"), "phase has no items");
            }
        }
    }

    fn validate_tracker(&mut self, content: &SiteContent) {
        if let Err(e) = Thresholds::new(content.tracker.thresholds.clone()) {
            self.add_error("tracker.thresholds", &e.to_string());
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Validates content and returns all issues, errors first.
#[must_use]
pub fn validate(content: &SiteContent) -> Vec<ValidationIssue> {
    let result = Validator::new().validate(content);
    result.errors.into_iter().chain(result.warnings).collect()
}

/// Returns `true` if `id` can be used verbatim as a URL fragment and DOM id.
#[must_use]
pub fn is_fragment_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
