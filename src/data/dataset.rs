use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};
use num_traits::{Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::PartialOrd;
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

/// Numeric feature value.
pub trait Number:
    Debug + Clone + Copy + Num + ToPrimitive + PartialOrd + Display + Send + Sync + 'static
{
}

impl<T> Number for T where
    T: Debug + Clone + Copy + Num + ToPrimitive + PartialOrd + Display + Send + Sync + 'static
{
}

/// Class label. Labels are totally ordered so that ties between classes can be
/// broken the same way on every run.
pub trait Label: Debug + Clone + Ord + Hash + Display + Send + Sync + 'static {}

impl<T> Label for T where T: Debug + Clone + Ord + Hash + Display + Send + Sync + 'static {}

/// Labeled rows: one feature row of `x` per entry of `y`.
pub struct Dataset<XT: Number, YT: Label> {
    pub x: DMatrix<XT>,
    pub y: DVector<YT>,
}

impl<XT: Number, YT: Label> Debug for Dataset<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<XT: Number, YT: Label> Clone for Dataset<XT, YT> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl<XT: Number, YT: Label> Dataset<XT, YT> {
    /// Pairs a feature matrix with its labels.
    ///
    /// # Errors
    ///
    /// Fails if the number of labels differs from the number of feature rows.
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Result<Self, TreeError> {
        if x.nrows() != y.len() {
            return Err(TreeError::LabelCountMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Builds a dataset from feature rows of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DataFormat`] for the first row whose length differs
    /// from the first row, or a label count mismatch.
    pub fn from_rows(rows: &[Vec<XT>], labels: Vec<YT>) -> Result<Self, TreeError> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(TreeError::DataFormat {
                row: index + 1,
                reason: format!("expected {} feature values, found {}", ncols, row.len()),
            });
        }
        let x = DMatrix::from_row_iterator(rows.len(), ncols, rows.iter().flatten().copied());
        Self::new(x, DVector::from_vec(labels))
    }

    /// Whether the dataset holds at least one row, with or without feature columns.
    pub fn is_not_empty(&self) -> bool {
        self.nrows() > 0
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Distinct values of one feature column in ascending order.
    pub fn unique_values(&self, feature_index: usize) -> Vec<XT> {
        let mut unique_values: Vec<_> = self.x.column(feature_index).iter().copied().collect();
        unique_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        unique_values.dedup();
        unique_values
    }

    /// Shuffles the rows with `rng` and cuts them at `floor(train_size * n)`.
    ///
    /// # Errors
    ///
    /// Fails if `train_size` lies outside `[0.0, 1.0]`.
    pub fn train_test_split<R: Rng + ?Sized>(
        &self,
        train_size: f64,
        rng: &mut R,
    ) -> Result<(Self, Self), TreeError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::InvalidParameter(
                "Train size should be between 0.0 and 1.0".into(),
            ));
        }

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        Ok((self.select(train_indices), self.select(test_indices)))
    }

    /// Partitions rows into `value <= threshold` (left) and the rest (right),
    /// keeping the original row order inside each side.
    ///
    /// # Panics
    ///
    /// Panics if `feature_index` is not a column of the dataset.
    pub fn split_on_threshold(&self, feature_index: usize, threshold: XT) -> (Self, Self) {
        assert!(
            feature_index < self.ncols(),
            "feature index {} out of range for {} features",
            feature_index,
            self.ncols()
        );
        let (left_indices, right_indices): (Vec<_>, Vec<_>) =
            (0..self.nrows()).partition(|&index| self.x[(index, feature_index)] <= threshold);

        (self.select(&left_indices), self.select(&right_indices))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(indices),
            y: DVector::from_iterator(indices.len(), indices.iter().map(|&i| self.y[i].clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn labels(values: &[&str]) -> DVector<String> {
        DVector::from_iterator(values.len(), values.iter().map(|s| s.to_string()))
    }

    fn four_rows() -> Dataset<i32, String> {
        let x = DMatrix::from_row_slice(4, 2, &[1, 2, 3, 4, 5, 6, 7, 8]);
        Dataset::new(x, labels(&["a", "b", "c", "d"])).unwrap()
    }

    #[test]
    fn test_dataset_new() {
        let x = DMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]);
        let y = labels(&["a", "b"]);
        let dataset = Dataset::new(x.clone(), y.clone()).unwrap();
        assert_eq!(dataset.x, x);
        assert_eq!(dataset.y, y);
    }

    #[test]
    fn test_dataset_new_label_mismatch() {
        let x = DMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]);
        let result = Dataset::new(x, labels(&["a"]));
        assert!(matches!(
            result,
            Err(TreeError::LabelCountMismatch { rows: 2, labels: 1 })
        ));
    }

    #[test]
    fn test_dataset_from_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let dataset = Dataset::from_rows(&rows, vec!["a", "b", "c"]).unwrap();
        assert_eq!(dataset.nrows(), 3);
        assert_eq!(dataset.ncols(), 2);
        assert_eq!(dataset.x[(1, 0)], 3.0);
        assert_eq!(dataset.x[(2, 1)], 6.0);
    }

    #[test]
    fn test_dataset_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let result = Dataset::from_rows(&rows, vec!["a", "b"]);
        assert!(matches!(result, Err(TreeError::DataFormat { row: 2, .. })));
    }

    #[test]
    fn test_dataset_formatting() {
        let x = DMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]);
        let dataset = Dataset::new(x, labels(&["a", "b"])).unwrap();

        let dataset_str = format!("{:?}", dataset);

        let expected_str = "\
Dataset {
    x: [
        [1, 2, ],
        [3, 4, ],
    ],
    y: [\"a\", \"b\", ]
}";

        assert_eq!(dataset_str, expected_str);
    }

    #[test]
    fn test_dataset_is_not_empty() {
        assert!(four_rows().is_not_empty());

        let empty_x = DMatrix::<f64>::from_row_slice(0, 2, &[]);
        let empty_dataset = Dataset::new(empty_x, labels(&[])).unwrap();
        assert!(!empty_dataset.is_not_empty());

        let no_columns = Dataset::new(DMatrix::<f64>::zeros(2, 0), labels(&["a", "b"])).unwrap();
        assert!(no_columns.is_not_empty());
    }

    #[test]
    fn test_dataset_unique_values() {
        let x = DMatrix::from_row_slice(5, 1, &[3.0, 1.0, 3.0, 2.0, 1.0]);
        let dataset = Dataset::new(x, labels(&["a", "a", "b", "b", "c"])).unwrap();
        assert_eq!(dataset.unique_values(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dataset_train_test_split() {
        let dataset = four_rows();
        let mut rng = StdRng::seed_from_u64(42);

        let (train_dataset, test_dataset) = dataset.train_test_split(0.75, &mut rng).unwrap();
        assert_eq!(train_dataset.nrows(), 3);
        assert_eq!(test_dataset.nrows(), 1);

        let mut all: Vec<_> = train_dataset
            .y
            .iter()
            .chain(test_dataset.y.iter())
            .cloned()
            .collect();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_dataset_train_test_split_keeps_rows_together() {
        let dataset = four_rows();
        let mut rng = StdRng::seed_from_u64(3);
        let (train_dataset, _) = dataset.train_test_split(1.0, &mut rng).unwrap();
        for i in 0..train_dataset.nrows() {
            let expected_first = match train_dataset.y[i].as_str() {
                "a" => 1,
                "b" => 3,
                "c" => 5,
                _ => 7,
            };
            assert_eq!(train_dataset.x[(i, 0)], expected_first);
            assert_eq!(train_dataset.x[(i, 1)], expected_first + 1);
        }
    }

    #[test]
    fn test_dataset_train_test_split_is_reproducible() {
        let dataset = four_rows();
        let (first, _) = dataset
            .train_test_split(0.5, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let (second, _) = dataset
            .train_test_split(0.5, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(first.x, second.x);
        assert_eq!(first.y, second.y);
    }

    #[test]
    fn test_dataset_train_test_split_invalid_size() {
        let dataset = four_rows();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(dataset.train_test_split(1.5, &mut rng).is_err());
        assert!(dataset.train_test_split(-0.1, &mut rng).is_err());
    }

    #[test]
    fn test_dataset_split_on_threshold() {
        let dataset = four_rows();

        let (left_dataset, right_dataset) = dataset.split_on_threshold(0, 4);
        assert_eq!(left_dataset.nrows(), 2);
        assert_eq!(right_dataset.nrows(), 2);
        assert_eq!(left_dataset.y, labels(&["a", "b"]));
        assert_eq!(right_dataset.y, labels(&["c", "d"]));
        assert_eq!(right_dataset.x[(0, 1)], 6);
    }

    #[test]
    fn test_dataset_split_on_threshold_is_inclusive() {
        let dataset = four_rows();
        let (left_dataset, right_dataset) = dataset.split_on_threshold(0, 5);
        assert_eq!(left_dataset.y, labels(&["a", "b", "c"]));
        assert_eq!(right_dataset.y, labels(&["d"]));
    }

    #[test]
    fn test_dataset_split_on_threshold_left_empty() {
        let dataset = four_rows();

        let (left_dataset, right_dataset) = dataset.split_on_threshold(0, -1);
        assert_eq!(left_dataset.nrows(), 0);
        assert_eq!(left_dataset.ncols(), 2);
        assert_eq!(right_dataset.nrows(), 4);
    }

    #[test]
    fn test_dataset_split_on_threshold_right_empty() {
        let dataset = four_rows();

        let (left_dataset, right_dataset) = dataset.split_on_threshold(0, 9);
        assert_eq!(left_dataset.nrows(), 4);
        assert_eq!(right_dataset.nrows(), 0);
    }

    #[test]
    #[should_panic]
    fn test_dataset_split_on_threshold_bad_feature() {
        let dataset = four_rows();
        let _ = dataset.split_on_threshold(2, 0);
    }
}
