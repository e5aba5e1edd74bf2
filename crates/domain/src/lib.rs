pub mod errors;
pub mod query;
pub mod requests;
pub mod stats;
pub mod todo;
pub mod validation;

pub use errors::*;
pub use query::*;
pub use requests::*;
pub use stats::*;
pub use todo::*;
pub use validation::*;
