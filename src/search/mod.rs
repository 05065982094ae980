pub mod serper;

pub use serper::{format_hits, SearchHit, SerperClient};
