//! Tools that let a manager (or a delegating agent) hand work to coworkers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::agent::Agent;
use crate::error::ToolError;
use crate::llm::{LLMQueue, Priority};
use crate::tools::{optional_string_arg, string_arg, string_params, Tool};

pub const DELEGATE_WORK: &str = "delegate_work_to_coworker";
pub const ASK_QUESTION: &str = "ask_question_to_coworker";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Delegate,
    Ask,
}

/// Runs a coworker on a delegated task or question. Coworkers cannot delegate further.
pub struct CoworkerTool {
    mode: Mode,
    coworkers: Arc<Vec<Agent>>,
    llm: LLMQueue,
    description: String,
}

impl CoworkerTool {
    fn new(mode: Mode, coworkers: Arc<Vec<Agent>>, llm: LLMQueue) -> Self {
        let roles = role_list(&coworkers);
        let description = match mode {
            Mode::Delegate => format!(
                "Delegate a specific task to one of the following coworkers: {}. \
                 Provide the coworker's role, the task, and ALL the context needed to execute it. \
                 They know nothing about the task, so explain everything instead of referencing it.",
                roles
            ),
            Mode::Ask => format!(
                "Ask a specific question to one of the following coworkers: {}. \
                 Provide the coworker's role, the question, and ALL the context needed to answer it. \
                 They know nothing about the question, so explain everything instead of referencing it.",
                roles
            ),
        };
        Self {
            mode,
            coworkers,
            llm,
            description,
        }
    }

    fn find(&self, role: &str) -> Option<&Agent> {
        self.coworkers.iter().find(|a| a.matches_role(role))
    }
}

fn role_list(coworkers: &[Agent]) -> String {
    coworkers
        .iter()
        .map(|a| a.role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Delegation tools over `coworkers`; empty when there is nobody to delegate to.
pub fn delegation_tools(coworkers: Vec<Agent>, llm: &LLMQueue) -> Vec<Arc<dyn Tool>> {
    if coworkers.is_empty() {
        return Vec::new();
    }
    let coworkers = Arc::new(coworkers);
    let delegate: Arc<dyn Tool> =
        Arc::new(CoworkerTool::new(Mode::Delegate, coworkers.clone(), llm.clone()));
    let ask: Arc<dyn Tool> = Arc::new(CoworkerTool::new(Mode::Ask, coworkers, llm.clone()));
    vec![delegate, ask]
}

#[async_trait]
impl Tool for CoworkerTool {
    fn name(&self) -> &str {
        match self.mode {
            Mode::Delegate => DELEGATE_WORK,
            Mode::Ask => ASK_QUESTION,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        match self.mode {
            Mode::Delegate => string_params(&[
                ("task", "The task to delegate"),
                ("context", "All the context needed to execute the task"),
                ("coworker", "Role of the coworker to delegate to"),
            ]),
            Mode::Ask => string_params(&[
                ("question", "The question to ask"),
                ("context", "All the context needed to answer the question"),
                ("coworker", "Role of the coworker to ask"),
            ]),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let field = match self.mode {
            Mode::Delegate => "task",
            Mode::Ask => "question",
        };
        let request = string_arg(self.name(), &args, field)?;
        let role = string_arg(self.name(), &args, "coworker")?;
        let context = optional_string_arg(&args, "context");

        let Some(coworker) = self.find(&role) else {
            return Ok(format!(
                "Error: coworker '{}' not found. Choose one of: {}",
                role,
                role_list(&self.coworkers)
            ));
        };

        info!("🧭 [MANAGER] {} -> {} ({})", self.name(), coworker.role, field);

        let mut prompt = request;
        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&context);
        }

        coworker
            .execute(&prompt, &[], &self.llm, Priority::High)
            .await
            .map_err(|e| ToolError::Crew(Box::new(e)))
    }
}
