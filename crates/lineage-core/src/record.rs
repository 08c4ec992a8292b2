//! Record normalization.
//!
//! Rows arrive from an external tabular decoder (CSV or spreadsheet) as
//! loose column-name → value mappings. Column spellings differ between
//! sources, so each logical field accepts a small set of aliases. The
//! normalizer resolves those aliases, trims the values, and rejects rows
//! that cannot name all three tiers.

use crate::error::{RecordError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read access to one decoded row.
///
/// Implemented for the map types tabular decoders usually hand back. A
/// missing column and a column holding a non-string value both read as
/// `None`.
pub trait Record {
    /// Returns the raw value stored under `name`, if any.
    fn field(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: BuildHasher> Record for IndexMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Record for [(K, V)] {
    fn field(&self, name: &str) -> Option<&str> {
        for (key, value) in self {
            let key: &str = key.as_ref();
            if key == name {
                return Some(value.as_ref());
            }
        }
        None
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Record for Vec<(K, V)> {
    fn field(&self, name: &str) -> Option<&str> {
        self.as_slice().field(name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

/// The three logical columns of a lineage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    App,
    Upstream,
    Table,
}

impl Field {
    /// Accepted column names, in lookup order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::App => &["appName", "app_name", "app", "application"],
            Self::Upstream => &["upstreamName", "upstream_name", "upstream"],
            Self::Table => &["tableName", "table_name", "tables", "table"],
        }
    }

    /// Resolves this field on a row.
    ///
    /// The first alias holding a non-blank value wins. A row that carries
    /// the column only as blanks is invalid; a row without any alias is
    /// missing the field.
    fn resolve<R: Record + ?Sized>(self, row: &R) -> Result<String> {
        let mut seen = false;
        for alias in self.aliases() {
            if let Some(raw) = row.field(alias) {
                seen = true;
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return Ok(trimmed.to_string());
                }
            }
        }

        if seen {
            Err(RecordError::InvalidRecord { field: self })
        } else {
            Err(RecordError::MissingField { field: self })
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::App => "app",
            Self::Upstream => "upstream",
            Self::Table => "table",
        };
        write!(f, "{}", s)
    }
}

/// A normalized `(app, upstream, table)` record.
///
/// All three values are trimmed and non-empty when produced by
/// [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub app: String,
    pub upstream: String,
    pub table: String,
}

impl Triple {
    pub fn new(
        app: impl Into<String>,
        upstream: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            app: app.into(),
            upstream: upstream.into(),
            table: table.into(),
        }
    }
}

/// Normalizes one raw row into a [`Triple`].
///
/// Fields are checked in app, upstream, table order and the first failure
/// is returned. Repeated tables are not deduplicated here.
pub fn normalize<R: Record + ?Sized>(row: &R) -> Result<Triple> {
    Ok(Triple {
        app: Field::App.resolve(row)?,
        upstream: Field::Upstream.resolve(row)?,
        table: Field::Table.resolve(row)?,
    })
}
