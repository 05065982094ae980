pub mod weights;
pub mod innovation;
pub mod social_value;

pub use weights::{DimensionSpec, DimensionWeights};
pub use innovation::InnovationScorer;
pub use social_value::SocialValueScorer;
