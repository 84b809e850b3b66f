//! Reading delimited text into a [`Dataset`] and parsing single input vectors.
//!
//! Every malformed row is reported with its 1-based data row number. Rows are
//! never skipped, because a silently dropped row changes the reported accuracy.

use super::dataset::Dataset;
use super::features::FeatureSet;
use crate::error::TreeError;
use csv::{ReaderBuilder, Trim};
use nalgebra::{DMatrix, DVector};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Loader for comma separated rows whose last field is the class label.
#[derive(Clone, Debug, Default)]
pub struct CsvLoader {
    has_headers: bool,
    feature_names: Option<Vec<String>>,
    delimiter: Option<u8>,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the first line as a header; its leading fields name the features.
    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Feature names for header-less files. Ignored when a header is present.
    pub fn feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn load_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(Dataset<f64, String>, FeatureSet), TreeError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading dataset");
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    pub fn load_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Dataset<f64, String>, FeatureSet), TreeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .delimiter(self.delimiter.unwrap_or(b','))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header_names = if self.has_headers {
            let headers = reader.headers()?;
            if headers.len() < 2 {
                return Err(TreeError::DataFormat {
                    row: 0,
                    reason: "header needs at least one feature and a label column".into(),
                });
            }
            Some(
                headers
                    .iter()
                    .take(headers.len() - 1)
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        let mut dimension: Option<usize> = header_names.as_ref().map(Vec::len);
        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let record = result?;
            if record.len() < 2 {
                return Err(TreeError::DataFormat {
                    row,
                    reason: "expected at least one feature and a label".into(),
                });
            }
            let expected = *dimension.get_or_insert(record.len() - 1);
            if record.len() - 1 != expected {
                return Err(TreeError::DataFormat {
                    row,
                    reason: format!(
                        "expected {} feature values, found {}",
                        expected,
                        record.len() - 1
                    ),
                });
            }

            let mut feature_row = Vec::with_capacity(expected);
            for (column, field) in record.iter().take(expected).enumerate() {
                feature_row.push(parse_value(field, row, column)?);
            }

            let label = record.get(expected).unwrap_or_default();
            if label.is_empty() {
                return Err(TreeError::DataFormat {
                    row,
                    reason: "missing label".into(),
                });
            }

            rows.push(feature_row);
            labels.push(label.to_string());
        }

        let dimension = dimension.unwrap_or(0);
        let features = match (header_names, &self.feature_names) {
            (Some(names), _) => FeatureSet::new(names)?,
            (None, Some(names)) => FeatureSet::new(names.iter().cloned())?,
            (None, None) => FeatureSet::numbered(dimension),
        };
        if features.len() != dimension {
            return Err(TreeError::FeatureArityMismatch {
                features: features.len(),
                columns: dimension,
            });
        }

        let x = DMatrix::from_row_iterator(rows.len(), dimension, rows.iter().flatten().copied());
        let dataset = Dataset::new(x, DVector::from_vec(labels))?;
        debug!(
            rows = dataset.nrows(),
            features = dataset.ncols(),
            "dataset loaded"
        );
        Ok((dataset, features))
    }
}

/// Parses one comma separated input vector aligned with `features`.
///
/// # Errors
///
/// Wrong arity is [`TreeError::MalformedInput`]; a value that isn't a finite
/// number is [`TreeError::DataFormat`].
pub fn parse_input(line: &str, features: &FeatureSet) -> Result<Vec<f64>, TreeError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() != features.len() {
        return Err(TreeError::MalformedInput {
            expected: features.len(),
            got: fields.len(),
        });
    }
    fields
        .iter()
        .enumerate()
        .map(|(column, field)| parse_value(field, 1, column))
        .collect()
}

fn parse_value(field: &str, row: usize, column: usize) -> Result<f64, TreeError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(TreeError::DataFormat {
            row,
            reason: format!("value '{}' in column {} is not finite", field, column + 1),
        }),
        Err(_) => Err(TreeError::DataFormat {
            row,
            reason: format!("value '{}' in column {} is not a number", field, column + 1),
        }),
    }
}
