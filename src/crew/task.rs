use std::collections::HashMap;

use super::interpolate::interpolate;
use crate::error::CrewError;

/// A unit of work assigned to an agent, by role.
#[derive(Clone, Debug)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: String,
    /// Indices of earlier tasks whose outputs this task reads
    pub context: Vec<usize>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<usize>) -> Self {
        self.context = context;
        self
    }

    pub fn interpolated(&self, inputs: &HashMap<String, String>) -> Result<Self, CrewError> {
        Ok(Self {
            description: interpolate(&self.description, inputs)?,
            expected_output: interpolate(&self.expected_output, inputs)?,
            agent: interpolate(&self.agent, inputs)?,
            context: self.context.clone(),
        })
    }

    pub fn prompt(&self, context: Option<&str>) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.description.trim(),
            self.expected_output.trim()
        );
        if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(context);
        }
        prompt
    }
}
