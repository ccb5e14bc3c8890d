//! Column resolution: which input header feeds each canonical field
//!
//! Matching is exact after normalization (trim + lowercase). Two tie-break
//! rules keep the result deterministic:
//! - if several input headers normalize to the same text, the leftmost wins
//! - if several aliases of one field are present, the alias declared first in
//!   the alias table wins, wherever its column sits in the file

use crate::schema::CanonicalField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Normalize a header or alias for comparison
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A canonical field bound to the input column that supplies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Canonical output field
    pub field: CanonicalField,
    /// Input header exactly as written in the file
    pub source_header: String,
    /// Position of the input column
    pub source_index: usize,
    /// Alias that produced the match
    pub alias: String,
}

/// Partial mapping from canonical field to input column
///
/// Bindings are kept in canonical field order and each field appears at most
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMapping {
    bindings: Vec<Binding>,
}

impl ResolvedMapping {
    /// All bindings, in canonical order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Binding for a field, if it was matched
    pub fn get(&self, field: CanonicalField) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.field == field)
    }

    /// Input header that feeds a field, if any
    pub fn source_header(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).map(|b| b.source_header.as_str())
    }

    pub fn is_matched(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    pub fn matched_count(&self) -> usize {
        self.bindings.len()
    }

    /// Fields that will be written as empty columns
    pub fn unmatched_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| !self.is_matched(*f))
            .collect()
    }

    /// Input headers that do not feed any canonical field
    pub fn unused_headers<'a, S: AsRef<str>>(&self, headers: &'a [S]) -> Vec<&'a str> {
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.bindings.iter().any(|b| b.source_index == *i))
            .map(|(_, h)| h.as_ref())
            .collect()
    }
}

/// Match input headers against the alias table
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> ResolvedMapping {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        index.entry(normalize_header(header.as_ref())).or_insert(i);
    }

    let mut bindings = Vec::with_capacity(CanonicalField::COUNT);
    for field in CanonicalField::ALL {
        let found = field
            .aliases()
            .iter()
            .find_map(|alias| index.get(&normalize_header(alias)).map(|&i| (*alias, i)));

        match found {
            Some((alias, i)) => {
                let source_header = headers[i].as_ref().to_string();
                debug!(field = %field, source = %source_header, alias, "matched column");
                bindings.push(Binding {
                    field,
                    source_header,
                    source_index: i,
                    alias: alias.to_string(),
                });
            }
            None => debug!(field = %field, "no matching column"),
        }
    }

    ResolvedMapping { bindings }
}
