//! Prompt template for launch milestone generation.
//!
//! The template is bundled at compile time; placeholders are substituted
//! per request.

use super::types::GenerationRequest;

/// Number of milestones requested from the service
pub const MILESTONE_COUNT: usize = 8;

/// Launch back-scheduling instruction
pub const LAUNCH_MILESTONES: &str = include_str!("defaults/launch_milestones.md");

/// Fill the template with the request's planning parameters
pub fn render(request: &GenerationRequest) -> String {
    LAUNCH_MILESTONES
        .replace("{therapeutic_area}", request.therapeutic_area.trim())
        .replace("{region}", request.region.trim())
        .replace("{target_date}", request.target_date.trim())
        .replace("{milestone_count}", &MILESTONE_COUNT.to_string())
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_non_empty() {
        assert!(LAUNCH_MILESTONES.len() > 50, "Prompt seems too short");
    }

    #[test]
    fn test_render_embeds_parameters() {
        let prompt = render(&GenerationRequest::new("Immunology", "2025-06-30", "EMEA"));
        assert!(prompt.contains("in Immunology"));
        assert!(prompt.contains("for the EMEA region"));
        assert!(prompt.contains("launch date of 2025-06-30"));
        assert!(prompt.contains("Provide 8 key milestones"));
        assert!(!prompt.contains('{'), "Unfilled placeholder in: {}", prompt);
    }

    #[test]
    fn test_render_covers_workstreams() {
        let prompt = render(&GenerationRequest::new("Oncology", "2026-01-15", "APAC"));
        for topic in ["regulatory", "manufacturing", "marketing", "field team training"] {
            assert!(prompt.contains(topic), "Prompt should mention {}", topic);
        }
    }
}
