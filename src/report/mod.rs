//! Maintenance report generation interface
//!
//! The planning core feeds a natural-language report generator: an external
//! text-generation call with prompt templating. Only the generator interface
//! and the prompt contract live here — the core has no dependency in the
//! other direction, and the generator may only consume the optimal points,
//! the aggregated risk factor and the observation count.

use crate::types::MaintenanceWindowResult;
use anyhow::Result;
use async_trait::async_trait;

/// Prompt template for the maintenance planning report.
///
/// Placeholders are substituted by [`render_prompt`].
pub const MAINTENANCE_REPORT_PROMPT: &str = r#"You are the planning assistant for railway track maintenance.
Summarize the recommended intervention windows for a maintenance planner.

### INPUT DATA
Average risk factor: {risk_factor}
Critical points analyzed: {total_points}
Recommended windows:
{windows}

### INSTRUCTIONS
1. Explain in plain language when maintenance should be scheduled and why.
2. Mention the projected cost of each window.
3. If no windows are listed, advise immediate manual review.
4. Output a short paragraph. No preamble. No markdown."#;

/// Fill the prompt template from a planning result.
///
/// Consumes only the fields the report contract allows: annotations,
/// `avg_risk_factor` and `total_points`.
pub fn render_prompt(result: &MaintenanceWindowResult) -> String {
    let windows = if result.annotations.is_empty() {
        "- none".to_string()
    } else {
        result
            .annotations
            .iter()
            .map(|p| format!("- {} (t={} months, projected cost {:.2})", p.label, p.month, p.cost))
            .collect::<Vec<_>>()
            .join("\n")
    };

    MAINTENANCE_REPORT_PROMPT
        .replace("{risk_factor}", &result.avg_risk_factor.to_string())
        .replace("{total_points}", &result.total_points.to_string())
        .replace("{windows}", &windows)
}

/// Seam for the external text-generation backend.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Produce a natural-language report for a planning result.
    async fn generate(&self, result: &MaintenanceWindowResult) -> Result<String>;
}

/// Deterministic template-based reporter used when no generation backend is
/// configured. Keeps the endpoint functional without an external dependency.
#[derive(Debug, Default)]
pub struct TemplateReporter;

#[async_trait]
impl ReportGenerator for TemplateReporter {
    async fn generate(&self, result: &MaintenanceWindowResult) -> Result<String> {
        if result.annotations.is_empty() {
            return Ok(format!(
                "No favorable maintenance window was identified over the planning horizon \
                 (average risk factor {}, {} critical points analyzed). \
                 Recommend immediate manual review of the cost projection.",
                result.avg_risk_factor, result.total_points
            ));
        }

        let windows = result
            .annotations
            .iter()
            .map(|p| format!("{} at a projected cost of {:.2}", p.label, p.cost))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(format!(
            "Based on {} critical points (average risk factor {}), the cheapest upcoming \
             intervention windows are: {}. Earlier windows are listed first; scheduling into \
             the first window minimizes exposure to further degradation.",
            result.total_points, result.avg_risk_factor, windows
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_maintenance;

    #[tokio::test]
    async fn test_template_reporter_mentions_each_window() {
        let result = plan_maintenance(&[0.2, 0.3, 0.25, 0.4, 0.5]).unwrap();
        let report = TemplateReporter.generate(&result).await.unwrap();
        for point in &result.annotations {
            assert!(report.contains(&point.label), "missing {}", point.label);
        }
        assert!(report.contains("0.33"));
    }

    #[test]
    fn test_prompt_contains_only_contracted_fields() {
        let result = plan_maintenance(&[0.5]).unwrap();
        let prompt = render_prompt(&result);
        assert!(prompt.contains("Average risk factor: 0.5"));
        assert!(prompt.contains("Critical points analyzed: 1"));
        // The full display curve never leaks into the prompt
        assert!(!prompt.contains("series_data"));
    }

    #[test]
    fn test_prompt_handles_empty_annotations() {
        let result = crate::types::MaintenanceWindowResult {
            series_data: Vec::new(),
            annotations: Vec::new(),
            avg_risk_factor: 0.5,
            total_points: 0,
        };
        assert!(render_prompt(&result).contains("- none"));
    }
}
