pub mod trip;
pub mod dataset;

pub use trip::*;
pub use dataset::*;
