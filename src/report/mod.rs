pub mod innovation;
pub mod social;
pub mod quality;
pub mod optimizer;
pub mod business;

pub use innovation::{render_innovation_markdown, render_innovation_text};
pub use social::{render_social_markdown, render_social_text};
pub use quality::{render_quality_markdown, QualityEvaluator, QualityResult};
pub use optimizer::ReportOptimizer;
pub use business::render_business_markdown;

/// Ten-cell bar for a 0-100 score.
pub fn bar(score: f64) -> String {
    let filled = ((score / 10.0).floor().max(0.0) as usize).min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), "░░░░░░░░░░");
        assert_eq!(bar(67.5), "██████░░░░");
        assert_eq!(bar(100.0), "██████████");
    }
}
