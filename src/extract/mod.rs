// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structured extraction
//!
//! Turns repeated DOM containers into uniform records: one record per
//! container, one field per supplied selector, values taken as rendered
//! text. Container order is DOM order; nothing is sorted, filtered, or
//! deduplicated here.

mod extractor;
mod record;

pub use extractor::{extract_all, extract_attribute, FieldSpec};
pub use record::Record;
