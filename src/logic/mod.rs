pub mod quantity;
pub mod search;
pub mod stats;
pub mod warnings;

pub use quantity::*;
pub use search::*;
pub use stats::*;
pub use warnings::*;
