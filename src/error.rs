use thiserror::Error;

/// Errors raised while loading data, growing a tree or classifying with it.
#[derive(Error, Debug)]
pub enum TreeError {
    /// A data row could not be interpreted. `row` is the 1-based data row.
    #[error("Malformed data in row {row}: {reason}")]
    DataFormat { row: usize, reason: String },

    /// Impurity, majority vote or training was requested on zero rows.
    #[error("Dataset is empty.")]
    EmptyDataset,

    /// The train/validation split left nothing to validate against.
    #[error("Validation set is empty, lower the train size.")]
    EmptyValidationSet,

    /// A tree node refers to a feature the feature set doesn't contain.
    #[error("Unknown feature '{0}'.")]
    UnknownFeature(String),

    /// The input vector is shorter than the features the tree needs.
    #[error("Input has {got} values, at least {expected} are required.")]
    MalformedInput { expected: usize, got: usize },

    #[error("Feature set has {features} names but the dataset has {columns} columns.")]
    FeatureArityMismatch { features: usize, columns: usize },

    #[error("Feature '{0}' appears more than once.")]
    DuplicateFeature(String),

    #[error("Dataset has {rows} feature rows but {labels} labels.")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Predictions and labels are of different sizes ({predictions} vs {labels}).")]
    LengthMismatch { predictions: usize, labels: usize },

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Tree wasn't built yet.")]
    NotFitted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
