//! Prompt templates for the triage analysis call.

use crate::base::{config::Config, types::Ticket};

/// System directive for the triage analyst.
pub const ANALYST_SYSTEM_DIRECTIVE: &str = r#"You are an expert AI assistant that processes technical support tickets.

Your job is to:
1. Summarize the issue.
2. Estimate its priority.
3. Provide helpful notes and resource links for human moderators.
4. List relevant technical skills required.

IMPORTANT:
- Respond with *only* valid raw JSON.
- Do NOT include markdown, code fences, comments, or any extra formatting.
- The format must be a raw JSON object."#;

/// Get the system directive, using the config override if provided.
pub fn get_system_directive(config: &Config) -> &str {
    if let Some(custom_directive) = &config.system_directive { custom_directive } else { ANALYST_SYSTEM_DIRECTIVE }
}

/// Build the analysis prompt for a single ticket.
///
/// The ticket title and description are embedded verbatim, with no escaping or
/// sanitization, so adversarial ticket text can steer the model.
pub fn build_ticket_prompt(ticket: &Ticket) -> String {
    format!(
        r#"Analyze the following support ticket and provide a JSON object with:

- summary: A short 1-2 sentence summary of the issue.
- priority: One of "low", "medium", or "high".
- helpfulNotes: A detailed technical explanation that a moderator can use to solve this issue. Include useful external links or resources if possible.
- relatedSkills: An array of relevant skills required to solve the issue (e.g., ["React", "MongoDB"]).

Ticket information:

- Title: {}
- Description: {}"#,
        ticket.title, ticket.description
    )
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::config::ConfigInner;

    #[test]
    fn prompt_embeds_ticket_fields() {
        let ticket = Ticket {
            title: "Login page crashes".to_string(),
            description: "Safari users get a blank screen after OAuth redirect.".to_string(),
        };

        let prompt = build_ticket_prompt(&ticket);

        assert!(prompt.contains("- Title: Login page crashes"));
        assert!(prompt.contains("- Description: Safari users get a blank screen after OAuth redirect."));
    }

    #[test]
    fn prompt_names_every_schema_field() {
        let ticket = Ticket {
            title: "t".to_string(),
            description: "d".to_string(),
        };

        let prompt = build_ticket_prompt(&ticket);

        for field in ["summary", "priority", "helpfulNotes", "relatedSkills"] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
    }

    #[test]
    fn directive_override_takes_precedence() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                system_directive: Some("You are a terse classifier.".to_string()),
                ..Default::default()
            }),
        };

        assert_eq!(get_system_directive(&config), "You are a terse classifier.");
    }

    #[test]
    fn directive_defaults_without_override() {
        let config = Config {
            inner: Arc::new(ConfigInner::default()),
        };

        assert_eq!(get_system_directive(&config), ANALYST_SYSTEM_DIRECTIVE);
    }
}
