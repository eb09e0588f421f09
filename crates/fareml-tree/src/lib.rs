pub mod binning;
pub mod decision_tree;
pub mod gradient_boosting;

pub use binning::*;
pub use decision_tree::*;
pub use gradient_boosting::*;
