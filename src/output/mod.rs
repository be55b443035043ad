// Output generation module

pub mod generator;
pub mod index;
pub mod templates;
pub mod writer;

pub use generator::*;
pub use index::*;
pub use templates::*;
pub use writer::*;
