pub mod repo;
pub mod score;
pub mod innovation;
pub mod social;
pub mod business;

pub use repo::*;
pub use score::*;
pub use innovation::*;
pub use social::*;
pub use business::*;
