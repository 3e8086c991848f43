#[macro_use]
mod macros;

pub mod checksum;
pub mod codepage;
pub mod column;
pub mod error;
pub mod metadata;
pub mod package;
pub mod property;
pub mod stream;
pub mod streamname;
pub mod stringpool;
pub mod table;
pub mod value;
