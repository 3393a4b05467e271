// SPDX-License-Identifier: MIT

//! Prompt templates: ordered role messages with `{name}` placeholders

use crate::adk::error::WorkflowError;
use crate::adk::model::Content;

/// A structured prompt: role messages rendered against variables
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    messages: Vec<(&'static str, String)>,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn system(mut self, template: impl Into<String>) -> Self {
        self.messages.push(("system", template.into()));
        self
    }

    pub fn user(mut self, template: impl Into<String>) -> Self {
        self.messages.push(("user", template.into()));
        self
    }

    /// Render every message, substituting `{name}` placeholders.
    ///
    /// Braces that do not enclose an identifier are kept verbatim. An
    /// identifier with no binding in `vars` is an error.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<Vec<Content>, WorkflowError> {
        self.messages
            .iter()
            .map(|(role, template)| Ok(Content::new(*role, substitute(template, vars)?)))
            .collect()
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}

fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String, WorkflowError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                let name = &after[..close];
                let value = vars
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| *v)
                    .ok_or_else(|| WorkflowError::UnboundVariable(name.to_string()))?;
                out.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_messages() {
        let prompt = PromptTemplate::new()
            .system("You summarize {kind} documents.")
            .user("Problem: {problem}\nAgain: {problem}");

        let messages = prompt
            .render(&[("kind", "planning"), ("problem", "slow onboarding")])
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].text(), "You summarize planning documents.");
        assert_eq!(
            messages[1].text(),
            "Problem: slow onboarding\nAgain: slow onboarding"
        );
    }

    #[test]
    fn test_unbound_variable_is_error() {
        let prompt = PromptTemplate::new().user("Hello {name}");
        let err = prompt.render(&[]).unwrap_err();
        assert_eq!(err, WorkflowError::UnboundVariable("name".to_string()));
    }

    #[test]
    fn test_non_identifier_braces_kept() {
        let prompt = PromptTemplate::new().user("Reply as {\"a\": 1} or { } for {x}");
        let messages = prompt.render(&[("x", "y")]).unwrap();
        assert_eq!(messages[0].text(), "Reply as {\"a\": 1} or { } for y");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let prompt = PromptTemplate::new().user("{a}");
        let messages = prompt.render(&[("a", "{b}")]).unwrap();
        assert_eq!(messages[0].text(), "{b}");
    }
}
