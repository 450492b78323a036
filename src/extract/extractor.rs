// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extraction operations

use super::record::Record;
use crate::dom::Document;
use crate::error::{Error, Result};

/// One output field: a name and a selector scoped within each container
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Output field name
    pub name: String,
    /// Selector evaluated inside the container
    pub selector: String,
    /// When true, an absent match fails the extraction with
    /// `Error::FieldMissing`; when false it yields `None`.
    pub required: bool,
}

impl FieldSpec {
    /// Create an optional field
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            required: false,
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Extract one record per container, in DOM order
///
/// For each container the first match of each field selector is taken and
/// its rendered text becomes the field value. A required field with no
/// match fails with `Error::FieldMissing` naming the field and the
/// zero-based container index. Zero containers is not an error.
pub fn extract_all(
    doc: &Document,
    container_selector: &str,
    fields: &[FieldSpec],
) -> Result<Vec<Record>> {
    let containers = doc.select_all(container_selector)?;
    let mut records = Vec::with_capacity(containers.len());

    for (index, container) in containers.iter().enumerate() {
        let mut record = Record::new();
        for field in fields {
            let value = container.select(&field.selector)?.map(|el| el.text());
            if value.is_none() && field.required {
                return Err(Error::FieldMissing {
                    field: field.name.clone(),
                    container: index,
                });
            }
            record.push(&field.name, value);
        }
        records.push(record);
    }

    tracing::debug!(
        container = container_selector,
        records = records.len(),
        "extraction complete"
    );
    Ok(records)
}

/// Extract one attribute value per matched element, in document order
///
/// Elements lacking the attribute contribute an empty string rather than
/// failing the batch; a missing `src` is common and not fatal.
pub fn extract_attribute(doc: &Document, selector: &str, attr: &str) -> Result<Vec<String>> {
    Ok(doc
        .select_all(selector)?
        .iter()
        .map(|el| el.attr(attr).unwrap_or_default().to_string())
        .collect())
}
