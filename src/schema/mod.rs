pub mod sequence;
pub mod tables;
pub mod types;
pub mod views;

pub use sequence::*;
pub use tables::*;
pub use types::*;
pub use views::*;
