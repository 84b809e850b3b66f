//! Gini impurity, information gain and majority vote over label vectors.

use crate::data::dataset::Label;
use crate::error::TreeError;
use nalgebra::DVector;
use std::collections::BTreeMap;

/// Number of occurrences of every label, ordered by label.
pub fn class_counts<YT: Label>(y: &DVector<YT>) -> BTreeMap<&YT, usize> {
    y.iter().fold(BTreeMap::new(), |mut acc, label| {
        *acc.entry(label).or_insert(0) += 1;
        acc
    })
}

/// Gini impurity `1 - Σ p_i²` of the labels.
///
/// # Errors
///
/// The impurity of zero rows is undefined and yields [`TreeError::EmptyDataset`].
pub fn gini<YT: Label>(y: &DVector<YT>) -> Result<f64, TreeError> {
    if y.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    let total = y.len() as f64;
    let sum_sq: f64 = class_counts(y)
        .values()
        .map(|&count| {
            let p_class = count as f64 / total;
            p_class * p_class
        })
        .sum();
    Ok(1.0 - sum_sq)
}

/// Impurity reduction of splitting a parent into `left` and `right`.
///
/// Each side is weighted by its share of rows. An empty side has weight zero
/// and contributes nothing, so its undefined impurity is never computed.
///
/// # Errors
///
/// Fails only if both sides are empty.
pub fn information_gain<YT: Label>(
    left: &DVector<YT>,
    right: &DVector<YT>,
    parent_impurity: f64,
) -> Result<f64, TreeError> {
    let total = (left.len() + right.len()) as f64;
    if total == 0.0 {
        return Err(TreeError::EmptyDataset);
    }

    let mut weighted_impurity = 0.0;
    for part in [left, right] {
        if !part.is_empty() {
            weighted_impurity += (part.len() as f64 / total) * gini(part)?;
        }
    }
    Ok(parent_impurity - weighted_impurity)
}

/// Most frequent label. Among equally frequent labels the smallest one wins.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] for an empty label vector.
pub fn majority_class<YT: Label>(y: &DVector<YT>) -> Result<YT, TreeError> {
    class_counts(y)
        .into_iter()
        // `max_by_key` keeps the last maximum, so walk the labels in reverse order.
        .rev()
        .max_by_key(|&(_, count)| count)
        .map(|(label, _)| label.clone())
        .ok_or(TreeError::EmptyDataset)
}
