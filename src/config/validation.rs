//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of `site.json` (serde handles syntactic)
//! - Check mappings are self-consistent (templated flag vs placeholders)
//! - Check the model variable names one of the placeholders
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Errors are reported, never fatal: the route table skips mappings it
//!   cannot compile and keeps the rest

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::schema::{Mapping, SiteConfig};
use crate::routing::pattern::{extract_variable_names, is_identifier};

static MODEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid model id regex"));

/// A single semantic problem found in the site configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}: href is required")]
    MissingHref(String),
    #[error("{0}: href must start with '/'")]
    RelativeHref(String),
    #[error("{0}: template is required")]
    MissingTemplate(String),
    #[error("{0}: href marked as templated but contains no template variables")]
    TemplatedWithoutVariables(String),
    #[error("{0}: href contains template variables but not marked as templated")]
    VariablesNotTemplated(String),
    #[error("{0}: model must contain only letters, digits, underscores and hyphens")]
    InvalidModel(String),
    #[error("{0}: model '{1}' does not name a variable of the href")]
    UnknownModelVariable(String, String),
    #[error("model_selector must be a valid variable name, was '{0}'")]
    InvalidModelSelector(String),
}

/// Validate a site configuration, collecting every problem.
pub fn validate_site(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(selector) = &config.model_selector {
        if !is_identifier(selector) {
            errors.push(ValidationError::InvalidModelSelector(selector.clone()));
        }
    }

    for (i, mapping) in config.mappings.iter().enumerate() {
        validate_mapping(&format!("mappings[{}]", i), mapping, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_mapping(prefix: &str, mapping: &Mapping, errors: &mut Vec<ValidationError>) {
    let variables = extract_variable_names(&mapping.href);

    if mapping.href.trim().is_empty() {
        errors.push(ValidationError::MissingHref(prefix.to_string()));
    } else {
        if mapping.templated && variables.is_empty() {
            errors.push(ValidationError::TemplatedWithoutVariables(prefix.to_string()));
        }
        if !mapping.templated && !variables.is_empty() {
            errors.push(ValidationError::VariablesNotTemplated(prefix.to_string()));
        }
        if !mapping.href.starts_with('/') {
            errors.push(ValidationError::RelativeHref(prefix.to_string()));
        }
    }

    if mapping.template.trim().is_empty() {
        errors.push(ValidationError::MissingTemplate(prefix.to_string()));
    }

    if let Some(model) = &mapping.model {
        if !MODEL_ID.is_match(model) {
            errors.push(ValidationError::InvalidModel(prefix.to_string()));
        } else if !variables.iter().any(|v| v == model) {
            errors.push(ValidationError::UnknownModelVariable(
                prefix.to_string(),
                model.clone(),
            ));
        }
    }
}
