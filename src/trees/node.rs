use crate::data::dataset::{Label, Number};
use crate::data::features::FeatureSet;
use crate::error::TreeError;
use std::fmt::{self, Display, Formatter};

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode<XT: Number, YT: Label> {
    /// Rows with `value <= threshold` on `feature` go `left`, the rest go `right`.
    Internal {
        feature: String,
        threshold: XT,
        left: Box<TreeNode<XT, YT>>,
        right: Box<TreeNode<XT, YT>>,
    },
    Leaf { value: YT },
}

impl<XT: Number, YT: Label> TreeNode<XT, YT> {
    pub fn leaf(value: YT) -> Self {
        Self::Leaf { value }
    }

    pub fn internal(feature: impl Into<String>, threshold: XT, left: Self, right: Self) -> Self {
        Self::Internal {
            feature: feature.into(),
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Length of the longest root-to-leaf path; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Walks from this node to a leaf and returns its label.
    ///
    /// Each internal node resolves its feature name against `features` and
    /// compares `input[position] <= threshold`.
    ///
    /// # Errors
    ///
    /// * [`TreeError::UnknownFeature`] if a visited node names a feature that
    ///   isn't in `features`.
    /// * [`TreeError::MalformedInput`] if `input` is too short for a feature on
    ///   the visited path.
    pub fn classify(&self, features: &FeatureSet, input: &[XT]) -> Result<YT, TreeError> {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { value } => return Ok(value.clone()),
                Self::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let position = features
                        .position(feature)
                        .ok_or_else(|| TreeError::UnknownFeature(feature.clone()))?;
                    let value = input.get(position).ok_or(TreeError::MalformedInput {
                        expected: position + 1,
                        got: input.len(),
                    })?;
                    node = if value <= threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    fn render(&self, output: &mut String, prefix: &str, connector: &str, child_prefix: &str) {
        output.push_str(prefix);
        output.push_str(connector);
        match self {
            Self::Leaf { value } => {
                output.push_str(&format!("Leaf: {}\n", value));
            }
            Self::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                output.push_str(&format!("Split: {} <= {}\n", feature, threshold));
                let next_prefix = format!("{}{}", prefix, child_prefix);
                left.render(output, &next_prefix, "├── ", "│   ");
                right.render(output, &next_prefix, "└── ", "    ");
            }
        }
    }
}

impl<XT: Number, YT: Label> Display for TreeNode<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        self.render(&mut output, "", "", "");
        write!(f, "{}", output)
    }
}
