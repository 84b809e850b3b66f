use crate::error::TreeError;
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// Column names of the iris measurements file.
pub const IRIS_FEATURES: [&str; 4] = ["sepal length", "sepal width", "petal length", "petal width"];

/// Ordered feature names, positionally aligned with the dataset columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSet {
    names: Vec<String>,
}

impl FeatureSet {
    /// # Errors
    ///
    /// Fails if a name occurs twice, since trees look features up by name.
    pub fn new<I, S>(names: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TreeError::DuplicateFeature(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// `feature_0`, `feature_1`, ... for data without a header row.
    pub fn numbered(count: usize) -> Self {
        Self {
            names: (0..count).map(|i| format!("feature_{}", i)).collect(),
        }
    }

    pub fn iris() -> Self {
        Self {
            names: IRIS_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Display for FeatureSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}
