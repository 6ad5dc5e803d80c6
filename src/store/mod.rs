pub mod file;
pub mod gateway;
pub mod memory;
pub mod traits;

pub use file::*;
pub use gateway::*;
pub use memory::*;
pub use traits::*;
