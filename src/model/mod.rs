pub mod common;
pub mod container;
pub mod database;
pub mod options;
pub mod sample;
pub mod selection;

pub use common::*;
pub use container::*;
pub use database::*;
pub use options::*;
pub use sample::*;
pub use selection::*;
