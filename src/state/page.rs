use serde::{Deserialize, Serialize};

use crate::error::BrowserError;
use crate::resource::ResourceSchema;

/// 1-based page number and a page size from the schema's allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageState {
    pub number: u32,
    pub size: u32,
}

impl PageState {
    pub fn for_schema(schema: &ResourceSchema) -> Self {
        Self {
            number: 1,
            size: schema.initial_page_size(),
        }
    }

    pub fn set_number(&mut self, number: u32) -> Result<bool, BrowserError> {
        if number == 0 {
            return Err(BrowserError::InvalidPage(number));
        }
        let changed = self.number != number;
        self.number = number;
        Ok(changed)
    }

    pub fn set_size(&mut self, schema: &ResourceSchema, size: u32) -> Result<bool, BrowserError> {
        if !schema.allows_page_size(size) {
            return Err(BrowserError::InvalidPageSize(size));
        }
        let changed = self.size != size;
        self.size = size;
        Ok(changed)
    }

    pub fn first(&mut self) {
        self.number = 1;
    }
}
