pub mod classifier;
pub mod evaluation;
pub mod impurity;
pub mod node;
pub mod params;
