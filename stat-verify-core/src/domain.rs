pub mod comparison;
pub mod config;
pub mod ids;
pub mod input;
pub mod result;
pub mod schema;
pub mod shape;

pub use comparison::*;
pub use config::*;
pub use ids::*;
pub use input::*;
pub use result::*;
pub use schema::*;
pub use shape::*;
