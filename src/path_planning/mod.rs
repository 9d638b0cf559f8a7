// Path planning: grid search and post-processing

pub mod a_star;
pub mod refine;

pub use a_star::*;
pub use refine::*;
