//! Facet selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::resource::{FacetKind, ResourceSchema};

/// Sentinel accepted by enumerated facets meaning "no constraint".
pub const ALL: &str = "all";

/// The selected value of one facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum FacetValue {
    /// No constraint.
    All,
    /// Free-text query.
    Text(String),
    /// Enumerated or server-known token.
    Token(String),
}

impl FacetValue {
    /// The query parameter value, or `None` for "all".
    pub fn as_param(&self) -> Option<&str> {
        match self {
            FacetValue::All => None,
            FacetValue::Text(s) | FacetValue::Token(s) => Some(s),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FacetValue::All)
    }
}

/// Exactly one value per declared facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    values: BTreeMap<String, FacetValue>,
}

impl FilterState {
    /// Every declared facet set to "all".
    pub fn for_schema(schema: &ResourceSchema) -> Self {
        Self {
            values: schema
                .facets()
                .iter()
                .map(|f| (f.name.clone(), FacetValue::All))
                .collect(),
        }
    }

    pub fn get(&self, facet: &str) -> Option<&FacetValue> {
        self.values.get(facet)
    }

    /// Set a facet from its raw input value. Returns whether the value changed.
    ///
    /// Unknown facets and values outside a choice facet's allow-list are
    /// rejected; nothing is silently dropped.
    pub fn set(
        &mut self,
        schema: &ResourceSchema,
        facet: &str,
        raw: &str,
    ) -> Result<bool, BrowserError> {
        let decl = schema
            .facet_named(facet)
            .ok_or_else(|| BrowserError::UnknownFacet(facet.to_string()))?;

        let value = match &decl.kind {
            FacetKind::Text if raw.trim().is_empty() => FacetValue::All,
            FacetKind::Text => FacetValue::Text(raw.to_string()),
            FacetKind::Choice(_) | FacetKind::Token if raw == ALL || raw.is_empty() => {
                FacetValue::All
            }
            FacetKind::Choice(choices) => {
                if !choices.iter().any(|c| c == raw) {
                    return Err(BrowserError::InvalidFacetValue {
                        facet: facet.to_string(),
                        value: raw.to_string(),
                    });
                }
                FacetValue::Token(raw.to_string())
            }
            FacetKind::Token => FacetValue::Token(raw.to_string()),
        };

        let previous = self.values.insert(facet.to_string(), value.clone());
        Ok(previous.as_ref() != Some(&value))
    }

    /// Reset every facet to "all". Returns whether anything changed.
    pub fn clear(&mut self) -> bool {
        let mut changed = false;
        for value in self.values.values_mut() {
            if !value.is_all() {
                *value = FacetValue::All;
                changed = true;
            }
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Facets with an actual constraint.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_param().map(|p| (k.as_str(), p)))
    }
}
