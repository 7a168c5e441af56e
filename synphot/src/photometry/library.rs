//! Filter and Lick index libraries.
//!
//! A library is a named collection that hands out ready-to-use bandpasses or
//! index definitions. The traits here are the seam for file-backed
//! collections; the crate ships in-memory implementations filled from raw
//! [`FilterRecord`]s and from the standard Lick/IDS table.
//!
//! Bandpasses are validated and built once, when a record is inserted, and
//! handed out as shared [`Arc`]s so their cached characteristics are computed
//! a single time no matter how many callers load them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bandpass::{Bandpass, BandpassError};
use super::filters::johnson_records;
use super::lick::{standard_definitions, LickIndexDefinition};
use super::spectrum::{DetectorType, SpectrumError};
use crate::quantity::catalog::parse_length_unit;
use crate::quantity::UnitError;

/// Errors that can occur when loading from a library
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LibraryError {
    #[error("{0} not found in library")]
    NotFound(String),

    #[error("Malformed record {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: BandpassError,
    },

    #[error("Invalid detector type in record: {0}")]
    DetectorType(#[from] SpectrumError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

fn default_wavelength_unit() -> String {
    "AA".to_string()
}

fn default_detector_type() -> String {
    "photon".to_string()
}

/// Raw filter description as delivered by a file reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
    pub name: String,
    pub wavelengths: Vec<f64>,
    pub transmission: Vec<f64>,
    /// Length unit name, e.g. "AA", "nm", "micron"
    #[serde(default = "default_wavelength_unit")]
    pub wavelength_unit: String,
    /// "photon" or "energy"
    #[serde(default = "default_detector_type")]
    pub detector_type: String,
}

impl FilterRecord {
    /// Validate the record and build its bandpass
    pub fn to_bandpass(&self) -> Result<Bandpass, LibraryError> {
        let unit = parse_length_unit(&self.wavelength_unit)?;
        let detector_type = self.detector_type.parse::<DetectorType>()?;
        Bandpass::new(
            self.name.clone(),
            &self.wavelengths,
            unit,
            &self.transmission,
            detector_type,
        )
        .map_err(|source| LibraryError::Malformed {
            name: self.name.clone(),
            source,
        })
    }
}

fn matching_names<'a, I>(names: I, needle: &str, case_sensitive: bool) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    if case_sensitive {
        names
            .filter(|name| name.contains(needle))
            .map(str::to_string)
            .collect()
    } else {
        let needle = needle.to_lowercase();
        names
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect()
    }
}

/// Source of photometric bandpasses
pub trait FilterLibrary: Send + Sync {
    /// Names of every filter in the library
    fn content(&self) -> Vec<String>;

    /// Load a filter by exact name
    fn load_filter(&self, name: &str) -> Result<Arc<Bandpass>, LibraryError>;

    /// Names containing `name` as a substring
    fn find(&self, name: &str, case_sensitive: bool) -> Vec<String> {
        let content = self.content();
        matching_names(content.iter().map(String::as_str), name, case_sensitive)
    }
}

/// Source of Lick index definitions
pub trait LickLibrary: Send + Sync {
    /// Names of every index in the library
    fn content(&self) -> Vec<String>;

    /// Load an index definition by exact name
    fn load_index(&self, name: &str) -> Result<LickIndexDefinition, LibraryError>;

    /// Names containing `name` as a substring
    fn find(&self, name: &str, case_sensitive: bool) -> Vec<String> {
        let content = self.content();
        matching_names(content.iter().map(String::as_str), name, case_sensitive)
    }
}

/// Filter library held in memory, ordered by name
#[derive(Debug, Clone, Default)]
pub struct MemoryFilterLibrary {
    filters: BTreeMap<String, Arc<Bandpass>>,
}

impl MemoryFilterLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the built-in Johnson U, B and V filters
    pub fn johnson() -> Result<Self, LibraryError> {
        Self::from_records(johnson_records())
    }

    /// Build a library from raw records; the first malformed record aborts
    pub fn from_records<I>(records: I) -> Result<Self, LibraryError>
    where
        I: IntoIterator<Item = FilterRecord>,
    {
        let mut library = Self::new();
        for record in records {
            library.insert_record(&record)?;
        }
        Ok(library)
    }

    /// Validate, build and add one record, replacing any filter of the same name
    pub fn insert_record(&mut self, record: &FilterRecord) -> Result<(), LibraryError> {
        let bandpass = record.to_bandpass()?;
        self.insert(bandpass);
        Ok(())
    }

    /// Add an already built bandpass under its own name
    pub fn insert(&mut self, bandpass: Bandpass) {
        let name = bandpass.name().to_string();
        if self.filters.insert(name.clone(), Arc::new(bandpass)).is_some() {
            log::warn!("Replacing filter {name} in library");
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FilterLibrary for MemoryFilterLibrary {
    fn content(&self) -> Vec<String> {
        self.filters.keys().cloned().collect()
    }

    fn load_filter(&self, name: &str) -> Result<Arc<Bandpass>, LibraryError> {
        self.filters
            .get(name)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(format!("Filter {name}")))
    }
}

/// The standard Lick/IDS indices plus common extensions
#[derive(Debug, Clone)]
pub struct BuiltinLickLibrary {
    definitions: Vec<LickIndexDefinition>,
}

impl BuiltinLickLibrary {
    pub fn new() -> Result<Self, LibraryError> {
        Ok(Self {
            definitions: standard_definitions()?,
        })
    }

    /// Library over a caller-supplied set of definitions
    pub fn from_definitions(definitions: Vec<LickIndexDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[LickIndexDefinition] {
        &self.definitions
    }
}

impl LickLibrary for BuiltinLickLibrary {
    fn content(&self) -> Vec<String> {
        self.definitions.iter().map(|d| d.name.clone()).collect()
    }

    fn load_index(&self, name: &str) -> Result<LickIndexDefinition, LibraryError> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(format!("Lick index {name}")))
    }
}
