pub mod sequence;
pub mod symbol;

pub use sequence::*;
pub use symbol::*;
