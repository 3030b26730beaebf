use std::collections::BTreeMap;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Feature '{name}' has {found} value(s), but the map holds {expected} bead(s)")]
    BeadCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Feature '{0}' was not computed by any descriptor backend")]
    MissingFeature(String),

    #[error("Bead index {index} is out of range ({count} bead(s))")]
    BeadOutOfRange { index: usize, count: usize },

    #[error("Feature '{name}' has a non-numeric value '{value}' in row {row}")]
    InvalidValue {
        name: String,
        row: usize,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Descriptor values keyed by feature name, one value per bead.
///
/// All features in a map describe the same beads, so every value vector has the same length.
/// Names are kept sorted; the order handed to a classifier is chosen by the caller through an
/// explicit key list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    values: BTreeMap<String, Vec<f64>>,
    bead_count: Option<usize>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the per-bead values of feature `name`, returning the values it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::BeadCountMismatch`] if `values` does not have one entry per bead
    /// of the features already present.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Option<Vec<f64>>, FeatureError> {
        let name = name.into();
        match self.bead_count {
            Some(expected) if expected != values.len() => {
                return Err(FeatureError::BeadCountMismatch {
                    name,
                    expected,
                    found: values.len(),
                });
            }
            _ => self.bead_count = Some(values.len()),
        }
        Ok(self.values.insert(name, values))
    }

    /// Merges `other` into this map. On a name present in both, `other` wins.
    pub fn join(&mut self, other: FeatureMap) -> Result<(), FeatureError> {
        for (name, values) in other.values {
            self.insert(name, values)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bead_count(&self) -> usize {
        self.bead_count.unwrap_or(0)
    }

    /// Keeps only the features whose name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.values.retain(|name, _| keep(name));
    }

    /// Collects the values of bead `bead` in the order given by `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::MissingFeature`] for the first key not in the map, or
    /// [`FeatureError::BeadOutOfRange`] if `bead` is not a valid bead index.
    pub fn vector_for_bead<S: AsRef<str>>(
        &self,
        bead: usize,
        keys: &[S],
    ) -> Result<Vec<f64>, FeatureError> {
        let count = self.bead_count();
        if bead >= count {
            return Err(FeatureError::BeadOutOfRange { index: bead, count });
        }
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                self.values
                    .get(key)
                    .map(|values| values[bead])
                    .ok_or_else(|| FeatureError::MissingFeature(key.to_string()))
            })
            .collect()
    }

    /// Writes a header of `keys` followed by one row per bead.
    pub fn write_csv<W: Write, S: AsRef<str>>(
        &self,
        writer: W,
        keys: &[S],
    ) -> Result<(), FeatureError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(keys.iter().map(|k| k.as_ref()))?;
        for bead in 0..self.bead_count() {
            let row = self.vector_for_bead(bead, keys)?;
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Reads a table with a header of feature names and one row per bead, the layout
    /// [`write_csv`](Self::write_csv) produces.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Csv`] for malformed CSV (including rows of the wrong width) and
    /// [`FeatureError::InvalidValue`] for a cell that is not a number. Rows are numbered from 1,
    /// not counting the header.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, FeatureError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let names = rdr.headers()?.clone();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for ((name, cell), column) in names.iter().zip(record.iter()).zip(columns.iter_mut()) {
                let value = cell.parse().map_err(|_| FeatureError::InvalidValue {
                    name: name.to_string(),
                    row: row + 1,
                    value: cell.to_string(),
                })?;
                column.push(value);
            }
        }

        let mut map = Self::new();
        for (name, column) in names.iter().zip(columns) {
            map.insert(name, column)?;
        }
        Ok(map)
    }
}
