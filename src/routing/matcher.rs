//! URI route matching.
//!
//! # Responsibilities
//! - Compile configured mappings into an ordered route table
//! - Match a request path against the table, first match wins
//! - Expose extracted path variables and the model-variant hint
//!
//! # Design Decisions
//! - Declaration order is the only precedence rule; no specificity sorting
//! - Non-templated mappings match by exact string equality (no trailing-slash folding)
//! - A mapping that fails to compile is logged and skipped, the rest stay usable
//! - Captured values are bound as received, with no further decoding

use std::collections::HashMap;

use crate::config::schema::Mapping;
use crate::routing::pattern::{PatternError, RoutePattern};

/// How a compiled mapping matches paths.
#[derive(Debug, Clone)]
enum PathMatcher {
    Exact(String),
    Template(RoutePattern),
}

/// A mapping paired with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledMapping {
    mapping: Mapping,
    matcher: PathMatcher,
}

impl CompiledMapping {
    pub fn compile(mapping: Mapping) -> Result<Self, PatternError> {
        let matcher = if mapping.templated {
            PathMatcher::Template(RoutePattern::compile(&mapping.href)?)
        } else {
            PathMatcher::Exact(mapping.href.clone())
        };
        Ok(Self { mapping, matcher })
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    fn match_path(&self, path: &str) -> Option<MatchResult> {
        let variables = match &self.matcher {
            PathMatcher::Exact(href) if href == path => HashMap::new(),
            PathMatcher::Exact(_) => return None,
            PathMatcher::Template(pattern) => pattern.captures(path)?.into_iter().collect(),
        };
        Some(MatchResult {
            mapping: self.mapping.clone(),
            variables,
        })
    }
}

/// Result of a successful route match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub mapping: Mapping,
    pub variables: HashMap<String, String>,
}

impl MatchResult {
    pub fn template_name(&self) -> &str {
        &self.mapping.template
    }

    /// Value of the path variable named by the mapping's `model`, if any.
    pub fn model_hint(&self) -> Option<&str> {
        let name = self.mapping.model_variable()?;
        self.variables.get(name).map(String::as_str)
    }
}

/// Ordered, immutable table of compiled mappings.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledMapping>,
}

impl RouteTable {
    /// Compile mappings in configuration order, skipping unusable ones.
    pub fn from_mappings(mappings: &[Mapping]) -> Self {
        let mut routes = Vec::with_capacity(mappings.len());
        for (index, mapping) in mappings.iter().enumerate() {
            match CompiledMapping::compile(mapping.clone()) {
                Ok(route) => routes.push(route),
                Err(e) => {
                    tracing::error!(index, href = %mapping.href, error = %e, "Skipping unusable mapping");
                }
            }
        }
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[CompiledMapping] {
        &self.routes
    }

    /// First mapping matching `path`, in configuration order.
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        self.routes.iter().find_map(|route| route.match_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(href: &str, templated: bool, template: &str, model: Option<&str>) -> Mapping {
        Mapping {
            href: href.into(),
            templated,
            template: template.into(),
            model: model.map(Into::into),
        }
    }

    #[test]
    fn test_exact_mapping_is_byte_identical() {
        let table = RouteTable::from_mappings(&[mapping("/about", false, "about-page", None)]);
        let result = table.match_path("/about").unwrap();
        assert_eq!(result.template_name(), "about-page");
        assert!(result.variables.is_empty());

        assert!(table.match_path("/about/").is_none());
        assert!(table.match_path("/About").is_none());
    }

    #[test]
    fn test_templated_mapping_extracts_variables() {
        let table = RouteTable::from_mappings(&[mapping(
            "/events/{id}/comments/{commentId}",
            true,
            "comment",
            None,
        )]);
        let result = table.match_path("/events/42/comments/7").unwrap();
        assert_eq!(result.variables.get("id").map(String::as_str), Some("42"));
        assert_eq!(result.variables.get("commentId").map(String::as_str), Some("7"));
        assert_eq!(result.model_hint(), None);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::from_mappings(&[
            mapping("/events/{id}", true, "generic", None),
            mapping("/events/special", false, "special", None),
        ]);
        assert_eq!(table.match_path("/events/special").unwrap().template_name(), "generic");
    }

    #[test]
    fn test_model_hint_is_variable_value() {
        let table = RouteTable::from_mappings(&[mapping(
            "/events/{id}",
            true,
            "event-detail",
            Some("id"),
        )]);
        let result = table.match_path("/events/vip").unwrap();
        assert_eq!(result.model_hint(), Some("vip"));
    }

    #[test]
    fn test_broken_mapping_is_skipped() {
        let table = RouteTable::from_mappings(&[
            mapping("/broken/{id", true, "broken", None),
            mapping("/ok/{id}", true, "ok", None),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.match_path("/ok/1").unwrap().template_name(), "ok");
        assert!(table.match_path("/broken/1").is_none());
    }

    #[test]
    fn test_no_mappings() {
        let table = RouteTable::from_mappings(&[]);
        assert!(table.is_empty());
        assert!(table.match_path("/").is_none());
    }
}
