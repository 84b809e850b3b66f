use crate::error::TreeError;

/// Stopping rules for tree growth. The defaults never stop a split that
/// improves purity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    pub min_samples_split: u16,
    pub max_depth: Option<u16>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            min_samples_split: 2,
            max_depth: None,
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<(), TreeError> {
        if min_samples_split < 2 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of samples to split must be greater than 1.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<(), TreeError> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidParameter(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    /// Whether a node holding `num_samples` rows at `depth` may still be split.
    pub fn allows_split(&self, num_samples: usize, depth: u16) -> bool {
        num_samples >= usize::from(self.min_samples_split)
            && self.max_depth.map_or(true, |max_depth| depth < max_depth)
    }
}
