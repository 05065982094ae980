pub mod funding;
pub mod researcher;

pub use funding::extract_funding_amounts;
pub use researcher::BusinessResearcher;
