use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use nalgebra::{DMatrix, DVector};

use crate::data::dataset::Label;
use crate::error::TreeError;

/// Counts of (true label, predicted label) pairs. Rows follow the true label,
/// columns the prediction, both in `classes` order.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix<T: Label> {
    pub classes: Vec<T>,
    pub matrix: DMatrix<usize>,
}

impl<T: Label> ConfusionMatrix<T> {
    pub fn total(&self) -> usize {
        self.matrix.sum()
    }

    pub fn correct(&self) -> usize {
        self.matrix.diagonal().sum()
    }

    /// Number of rows with true label `truth` predicted as `predicted`.
    pub fn get(&self, truth: &T, predicted: &T) -> usize {
        let row = self.classes.iter().position(|c| c == truth);
        let col = self.classes.iter().position(|c| c == predicted);
        match (row, col) {
            (Some(row), Some(col)) => self.matrix[(row, col)],
            _ => 0,
        }
    }
}

impl<T: Label> Display for ConfusionMatrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.to_string().len())
            .chain(std::iter::once(6))
            .max()
            .unwrap_or(6);

        write!(f, "{:>width$}", "", width = width)?;
        for class in &self.classes {
            write!(f, " {:>width$}", class.to_string(), width = width)?;
        }
        writeln!(f)?;
        for (row, class) in self.classes.iter().enumerate() {
            write!(f, "{:>width$}", class.to_string(), width = width)?;
            for col in 0..self.classes.len() {
                write!(f, " {:>width$}", self.matrix[(row, col)], width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub trait ClassificationMetrics<T: Label> {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    ///
    /// # Returns
    ///
    /// The confusion matrix over every label seen in either vector, in label order.
    fn confusion_matrix(
        &self,
        y_true: &DVector<T>,
        y_pred: &DVector<T>,
    ) -> Result<ConfusionMatrix<T>, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::LengthMismatch {
                predictions: y_pred.len(),
                labels: y_true.len(),
            });
        }

        let classes_set: BTreeSet<&T> = y_true.iter().chain(y_pred.iter()).collect();
        let classes: Vec<T> = classes_set.into_iter().cloned().collect();

        let mut matrix = DMatrix::zeros(classes.len(), classes.len());

        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            // Both lookups succeed: `classes` holds every label of both vectors.
            if let (Ok(row), Ok(col)) = (classes.binary_search(y_t), classes.binary_search(y_p)) {
                matrix[(row, col)] += 1;
            }
        }

        Ok(ConfusionMatrix { classes, matrix })
    }

    /// Computes the accuracy based on the true labels and predicted labels.
    ///
    /// # Errors
    ///
    /// Fails on vectors of different length, or empty ones.
    fn accuracy(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if matrix.total() == 0 {
            return Err(TreeError::EmptyDataset);
        }

        Ok(matrix.correct() as f64 / matrix.total() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    struct MockClassifier;

    impl ClassificationMetrics<u8> for MockClassifier {}
    impl ClassificationMetrics<String> for MockClassifier {}

    fn labels(values: &[&str]) -> DVector<String> {
        DVector::from_iterator(values.len(), values.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_confusion_matrix() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1u8, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1u8, 1, 0, 0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();

        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);

        assert_eq!(result.matrix, expected);
        assert_eq!(result.classes, vec![0, 1]);
    }

    #[test]
    fn test_confusion_matrix_unequal() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1u8, 0, 1, 0, 1, 0]);
        let y_pred = DVector::from_vec(vec![1u8, 1, 0, 0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred);

        assert!(matches!(result, Err(TreeError::LengthMismatch { .. })));
    }

    #[test]
    fn test_confusion_matrix_multiclass_labels() {
        let classifier = MockClassifier;

        let y_true = labels(&["setosa", "versicolor", "virginica", "versicolor", "setosa", "virginica"]);
        let y_pred = labels(&["setosa", "virginica", "versicolor", "versicolor", "setosa", "virginica"]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();
        let expected = DMatrix::from_vec(3, 3, vec![2, 0, 0, 0, 1, 1, 0, 1, 1]);

        assert_eq!(result.matrix, expected);
        assert_eq!(result.classes, vec!["setosa", "versicolor", "virginica"]);
        assert_eq!(
            result.get(&"versicolor".to_string(), &"virginica".to_string()),
            1
        );
        assert_eq!(result.get(&"setosa".to_string(), &"unknown".to_string()), 0);
    }

    #[test]
    fn test_confusion_matrix_prediction_only_class() {
        let classifier = MockClassifier;

        let y_true = labels(&["a", "a"]);
        let y_pred = labels(&["a", "b"]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();
        assert_eq!(result.classes, vec!["a", "b"]);
        assert_eq!(result.get(&"a".to_string(), &"b".to_string()), 1);
    }

    #[test]
    fn test_accuracy() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1u8, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1u8, 1, 0, 0, 1]);

        let result = classifier.accuracy(&y_true, &y_pred).unwrap();

        assert_eq!(result, 0.6);
    }

    #[test]
    fn test_accuracy_perfect_classification() {
        let classifier = MockClassifier;

        let y_true = labels(&["a", "b", "a"]);
        let y_pred = labels(&["a", "b", "a"]);

        let result = classifier.accuracy(&y_true, &y_pred).unwrap();

        assert_eq!(result, 1.0);
    }

    #[test]
    fn test_accuracy_empty() {
        let classifier = MockClassifier;
        let result = classifier.accuracy(&labels(&[]), &labels(&[]));
        assert!(matches!(result, Err(TreeError::EmptyDataset)));
    }

    #[test]
    fn test_display() {
        let classifier = MockClassifier;
        let result = classifier
            .confusion_matrix(&labels(&["a", "b", "b"]), &labels(&["a", "b", "a"]))
            .unwrap();
        let expected = concat!(
            "            a      b\n",
            "     a      1      0\n",
            "     b      1      1\n",
        );
        assert_eq!(result.to_string(), expected);
    }
}
