//! # Rusty-cart
//!
//! `rusty-cart` grows binary decision trees with the CART algorithm: every node
//! is split on the feature and threshold that reduce Gini impurity the most, and
//! nodes that can't be improved become majority-vote leaves.
//! It also contains a CSV loader, hold-out evaluation and classification metrics.
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_cart::data::dataset::Dataset;
//! use rusty_cart::data::features::FeatureSet;
//! use rusty_cart::trees::classifier::DecisionTreeClassifier;
//!
//! let rows = vec![
//!     vec![1.0, 1.0],
//!     vec![1.0, 9.0],
//!     vec![9.0, 1.0],
//!     vec![9.0, 9.0],
//! ];
//! let labels = vec!["A", "A", "B", "B"]
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//! let dataset = Dataset::from_rows(&rows, labels).unwrap();
//! let features = FeatureSet::new(["width", "height"]).unwrap();
//!
//! let mut model = DecisionTreeClassifier::new();
//! model.fit(&dataset, &features).unwrap();
//!
//! assert_eq!(model.classify(&[1.0, 5.0]).unwrap(), "A");
//! assert_eq!(model.classify(&[9.0, 5.0]).unwrap(), "B");
//! ```

/// Dataset, feature names and loading utilities
pub mod data;
/// Error type shared by the whole crate
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
