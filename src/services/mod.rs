//! Service layer for the aggregator.
//!
//! This module contains the business logic for:
//! - Deduplicating ingestion (`IngestEngine`)
//! - Derived category, language, keyword and author indexes (`DerivedIndexes`)
//! - Keyword extraction (`extract_keywords`)
//! - Article document parsing (`read_document`)

mod engine;
mod indexes;
mod keywords;
mod locks;
mod parser;

pub use engine::{Admission, FrozenState, IngestEngine};
pub use indexes::{DerivedIndexes, IndexSnapshot};
pub use keywords::{KEYWORD_LANGUAGE, extract_keywords};
pub use locks::{IdentityKey, KeyLocks};
pub use parser::{ParsedDocument, parse_document, read_document};
