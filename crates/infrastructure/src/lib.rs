pub mod error;
pub mod memory;
pub mod mongo;
pub mod repository;

pub use error::*;
pub use memory::*;
pub use mongo::*;
pub use repository::*;
