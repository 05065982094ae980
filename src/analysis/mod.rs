pub mod keywords;
pub mod tech_stack;
pub mod engineering;
pub mod architecture;
pub mod code;
pub mod solution;
pub mod pipeline;

pub use tech_stack::{TechStackAnalyzer, TechStackResult};
pub use engineering::{EngineeringAnalyzer, EngineeringResult};
pub use architecture::{ArchitectureAnalyzer, ArchitectureResult};
pub use code::{CodeAnalysisResult, CodeAnalyzer};
pub use solution::{SolutionAnalyzer, SolutionResult};
pub use pipeline::{EvaluationPipeline, EvaluationSummary};
