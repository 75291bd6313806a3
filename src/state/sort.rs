//! Sort selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::resource::ResourceSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Value of the `sort_order` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort field (always from the schema's sortable set) and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn for_schema(schema: &ResourceSchema) -> Self {
        Self {
            field: schema.default_sort_field().to_string(),
            direction: schema.default_direction(),
        }
    }

    /// Header-click semantics: the same field flips direction, a new field
    /// starts at the schema's default direction.
    pub fn select(&mut self, schema: &ResourceSchema, field: &str) -> Result<(), BrowserError> {
        ensure_sortable(schema, field)?;
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = schema.default_direction();
        }
        Ok(())
    }

    /// Set field and direction explicitly. Returns whether anything changed.
    pub fn set(
        &mut self,
        schema: &ResourceSchema,
        field: &str,
        direction: SortDirection,
    ) -> Result<bool, BrowserError> {
        ensure_sortable(schema, field)?;
        let changed = self.field != field || self.direction != direction;
        self.field = field.to_string();
        self.direction = direction;
        Ok(changed)
    }
}

fn ensure_sortable(schema: &ResourceSchema, field: &str) -> Result<(), BrowserError> {
    match schema.sort_field(field) {
        Some(_) => Ok(()),
        None => Err(BrowserError::UnsortableField(field.to_string())),
    }
}
