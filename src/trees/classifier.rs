//! Decision Tree Classifier
use super::impurity::{gini, information_gain, majority_class};
use super::{node::TreeNode, params::TreeParams};
use crate::{
    data::dataset::{Dataset, Label, Number},
    data::features::FeatureSet,
    error::TreeError,
    metrics::confusion::ClassificationMetrics,
};
use nalgebra::{DMatrix, DVector};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, trace};

struct SplitData<XT: Number, YT: Label> {
    feature_index: usize,
    threshold: XT,
    left: Dataset<XT, YT>,
    right: Dataset<XT, YT>,
    information_gain: f64,
}

/// Grows a tree on `dataset` with the default stopping rules.
///
/// # Errors
///
/// Fails on an empty dataset or when `features` doesn't match the column count.
pub fn build_tree<XT: Number, YT: Label>(
    dataset: &Dataset<XT, YT>,
    features: &FeatureSet,
) -> Result<TreeNode<XT, YT>, TreeError> {
    let mut classifier = DecisionTreeClassifier::new();
    classifier.fit(dataset, features)?;
    classifier.into_root().ok_or(TreeError::NotFitted)
}

/// CART classifier: binary splits chosen by Gini information gain.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<XT: Number, YT: Label> {
    root: Option<TreeNode<XT, YT>>,
    features: Option<FeatureSet>,
    tree_params: TreeParams,
}

impl<XT: Number, YT: Label> Default for DecisionTreeClassifier<XT, YT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: Number, YT: Label> ClassificationMetrics<YT> for DecisionTreeClassifier<XT, YT> {}

impl<XT: Number, YT: Label> DecisionTreeClassifier<XT, YT> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            features: None,
            tree_params: TreeParams::new(),
        }
    }

    /// Creates a new instance of the decision tree classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `min_samples_split` - The minimum number of samples required to split an internal node.
    /// * `max_depth` - The maximum depth of the tree.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum number of samples to split is less than 2 or if the maximum depth is less than 1.
    pub fn with_params(
        min_samples_split: Option<u16>,
        max_depth: Option<u16>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();

        tree.set_min_samples_split(min_samples_split.unwrap_or(2))?;
        tree.set_max_depth(max_depth)?;
        Ok(tree)
    }

    pub fn from_params(tree_params: TreeParams) -> Self {
        Self {
            root: None,
            features: None,
            tree_params,
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.tree_params.max_depth()
    }

    pub fn min_samples_split(&self) -> u16 {
        self.tree_params.min_samples_split()
    }

    /// The trained tree, if any.
    pub fn root(&self) -> Option<&TreeNode<XT, YT>> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<TreeNode<XT, YT>> {
        self.root
    }

    /// Feature names the tree was trained against.
    pub fn features(&self) -> Option<&FeatureSet> {
        self.features.as_ref()
    }

    /// Builds the decision tree from a dataset, replacing any earlier tree.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The dataset containing features and labels.
    /// * `features` - Names of the dataset columns, in column order.
    ///
    /// # Errors
    ///
    /// Fails on an empty dataset or when `features` doesn't name every column.
    pub fn fit(
        &mut self,
        dataset: &Dataset<XT, YT>,
        features: &FeatureSet,
    ) -> Result<String, TreeError> {
        if features.len() != dataset.ncols() {
            return Err(TreeError::FeatureArityMismatch {
                features: features.len(),
                columns: dataset.ncols(),
            });
        }
        if !dataset.is_not_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let root = self.build_tree(dataset, features, 0)?;
        debug!(
            depth = root.depth(),
            leaves = root.leaf_count(),
            samples = dataset.nrows(),
            "finished building the tree"
        );
        self.root = Some(root);
        self.features = Some(features.clone());
        Ok("Finished building the tree.".into())
    }

    /// Predicts the label of a single feature vector.
    ///
    /// # Errors
    ///
    /// Fails if the tree wasn't built yet or the input is shorter than a
    /// feature on the visited path.
    pub fn classify(&self, input: &[XT]) -> Result<YT, TreeError> {
        match (&self.root, &self.features) {
            (Some(root), Some(features)) => root.classify(features, input),
            _ => Err(TreeError::NotFitted),
        }
    }

    /// Predicts the labels for every row of `features`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or a row
    /// can't be classified.
    pub fn predict(&self, prediction_features: &DMatrix<XT>) -> Result<DVector<YT>, TreeError> {
        let (root, features) = match (&self.root, &self.features) {
            (Some(root), Some(features)) => (root, features),
            _ => return Err(TreeError::NotFitted),
        };

        let predictions = (0..prediction_features.nrows())
            .into_par_iter()
            .map(|index| {
                let row: Vec<XT> = prediction_features.row(index).iter().copied().collect();
                root.classify(features, &row)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    fn build_tree(
        &self,
        dataset: &Dataset<XT, YT>,
        features: &FeatureSet,
        depth: u16,
    ) -> Result<TreeNode<XT, YT>, TreeError> {
        let current_impurity = gini(&dataset.y)?;

        if self.tree_params.allows_split(dataset.nrows(), depth) {
            if let Some(best_split) = self.get_best_split(dataset, current_impurity)? {
                if best_split.information_gain > 0.0 {
                    let feature = features.name(best_split.feature_index).ok_or(
                        TreeError::FeatureArityMismatch {
                            features: features.len(),
                            columns: dataset.ncols(),
                        },
                    )?;
                    debug!(
                        feature,
                        threshold = %best_split.threshold,
                        impurity = current_impurity,
                        gain = best_split.information_gain,
                        samples = dataset.nrows(),
                        depth,
                        "splitting node"
                    );

                    let left_node = self.build_tree(&best_split.left, features, depth + 1)?;
                    let right_node = self.build_tree(&best_split.right, features, depth + 1)?;
                    return Ok(TreeNode::internal(
                        feature,
                        best_split.threshold,
                        left_node,
                        right_node,
                    ));
                }
            }
        }

        let leaf_value = majority_class(&dataset.y)?;
        trace!(
            label = %leaf_value,
            impurity = current_impurity,
            samples = dataset.nrows(),
            depth,
            "leaf"
        );
        Ok(TreeNode::leaf(leaf_value))
    }

    /// Scans every feature in column order and its distinct values in
    /// ascending order. Only a strictly greater gain replaces the current
    /// best, so the first candidate reaching the maximum wins. Candidates that
    /// leave either side empty are skipped.
    fn get_best_split(
        &self,
        dataset: &Dataset<XT, YT>,
        current_impurity: f64,
    ) -> Result<Option<SplitData<XT, YT>>, TreeError> {
        let mut best_split: Option<SplitData<XT, YT>> = None;
        let mut best_information_gain = f64::NEG_INFINITY;

        for feature_index in 0..dataset.ncols() {
            for value in dataset.unique_values(feature_index) {
                let (left_child, right_child) = dataset.split_on_threshold(feature_index, value);

                if left_child.is_not_empty() && right_child.is_not_empty() {
                    let current_information_gain =
                        information_gain(&left_child.y, &right_child.y, current_impurity)?;

                    if current_information_gain > best_information_gain {
                        best_split = Some(SplitData {
                            feature_index,
                            threshold: value,
                            left: left_child,
                            right: right_child,
                            information_gain: current_information_gain,
                        });
                        best_information_gain = current_information_gain;
                    }
                }
            }
        }
        Ok(best_split)
    }
}
