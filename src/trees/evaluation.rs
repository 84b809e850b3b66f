//! Hold-out training and evaluation of a decision tree.
use super::classifier::DecisionTreeClassifier;
use super::params::TreeParams;
use crate::data::dataset::{Dataset, Label, Number};
use crate::data::features::FeatureSet;
use crate::error::TreeError;
use crate::metrics::confusion::{ClassificationMetrics, ConfusionMatrix};
use rand::Rng;
use tracing::info;

/// A trained classifier together with its validation results.
#[derive(Clone, Debug)]
pub struct Evaluation<XT: Number, YT: Label> {
    pub classifier: DecisionTreeClassifier<XT, YT>,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix<YT>,
    pub train_size: usize,
    pub validation_size: usize,
}

/// Shuffles `dataset` with `rng`, trains on the first
/// `floor(train_size * n)` rows and measures accuracy on the rest.
///
/// A seeded `rng` makes the tree and the accuracy reproducible.
///
/// # Errors
///
/// * [`TreeError::InvalidParameter`] if `train_size` is outside `[0, 1]`.
/// * [`TreeError::EmptyValidationSet`] if no rows are left for validation.
/// * [`TreeError::EmptyDataset`] if no rows are left for training.
pub fn train_and_evaluate<XT, YT, R>(
    dataset: &Dataset<XT, YT>,
    features: &FeatureSet,
    train_size: f64,
    tree_params: &TreeParams,
    rng: &mut R,
) -> Result<Evaluation<XT, YT>, TreeError>
where
    XT: Number,
    YT: Label,
    R: Rng + ?Sized,
{
    let (train_dataset, validation_dataset) = dataset.train_test_split(train_size, rng)?;
    if !validation_dataset.is_not_empty() {
        return Err(TreeError::EmptyValidationSet);
    }
    if !train_dataset.is_not_empty() {
        return Err(TreeError::EmptyDataset);
    }

    let mut classifier = DecisionTreeClassifier::from_params(tree_params.clone());
    classifier.fit(&train_dataset, features)?;

    let predictions = classifier.predict(&validation_dataset.x)?;
    let confusion = classifier.confusion_matrix(&validation_dataset.y, &predictions)?;
    let accuracy = confusion.correct() as f64 / confusion.total() as f64;

    info!(
        train = train_dataset.nrows(),
        validation = validation_dataset.nrows(),
        accuracy,
        "evaluated decision tree"
    );

    Ok(Evaluation {
        classifier,
        accuracy,
        confusion,
        train_size: train_dataset.nrows(),
        validation_size: validation_dataset.nrows(),
    })
}
