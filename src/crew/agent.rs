use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::interpolate::interpolate;
use crate::constants;
use crate::error::CrewError;
use crate::llm::{ChatMessage, ChatRequest, LLMQueue, Priority, ToolCall, ToolSpec};
use crate::tools::{parse_arguments, Tool};

const EMPTY_REPLY_NUDGE: &str =
    "Your last reply was empty. Either use a tool or give your complete final answer.";

const FORCE_FINAL_ANSWER: &str = "You have reached the maximum number of steps. \
     Do not use any more tools. Give your best complete final answer now, based on what you already know.";

/// A role-playing LLM worker with its own tools and step budget.
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<Arc<dyn Tool>>,
    pub max_iter: usize,
    pub allow_delegation: bool,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("max_iter", &self.max_iter)
            .field("allow_delegation", &self.allow_delegation)
            .finish()
    }
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            max_iter: constants::crew::AGENT_MAX_ITER,
            allow_delegation: false,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Case-insensitive role comparison, ignoring surrounding quotes and whitespace
    pub fn matches_role(&self, role: &str) -> bool {
        let wanted = role.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        self.role.trim().eq_ignore_ascii_case(wanted)
    }

    pub fn interpolated(&self, inputs: &HashMap<String, String>) -> Result<Self, CrewError> {
        Ok(Self {
            role: interpolate(&self.role, inputs)?,
            goal: interpolate(&self.goal, inputs)?,
            backstory: interpolate(&self.backstory, inputs)?,
            ..self.clone()
        })
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}\n\n\
             Use the available tools whenever you need information you do not have. \
             When you have the final answer, reply with it directly and do not call any more tools.",
            self.role, self.backstory, self.goal
        )
    }

    /// Run the tool-calling loop until the model answers without tool calls.
    ///
    /// `extra_tools` are offered alongside the agent's own tools (delegation, for one).
    pub async fn execute(
        &self,
        task_prompt: &str,
        extra_tools: &[Arc<dyn Tool>],
        llm: &LLMQueue,
        priority: Priority,
    ) -> Result<String, CrewError> {
        let tools: Vec<Arc<dyn Tool>> = self.tools.iter().chain(extra_tools).cloned().collect();
        let specs: Vec<ToolSpec> = tools.iter().map(|t| t.spec()).collect();

        let mut messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(task_prompt),
        ];

        for iteration in 1..=self.max_iter {
            info!(
                "🤖 [AGENT] {} step {}/{} ({} priority)",
                self.role,
                iteration,
                self.max_iter,
                priority.as_str()
            );

            let reply = llm
                .complete(
                    ChatRequest {
                        messages: messages.clone(),
                        tools: specs.clone(),
                    },
                    priority,
                )
                .await?;

            if reply.tool_calls.is_empty() {
                if let Some(answer) = reply.answer() {
                    info!("🤖 [AGENT] {} final answer after {} steps", self.role, iteration);
                    return Ok(answer.to_string());
                }
                warn!("🤖 [AGENT] {} returned an empty reply", self.role);
                messages.push(reply.into_message());
                messages.push(ChatMessage::user(EMPTY_REPLY_NUDGE));
                continue;
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply.into_message());
            for call in calls {
                let observation = run_tool(&tools, &call).await;
                messages.push(ChatMessage::tool_result(call.id, observation));
            }
        }

        warn!(
            "🤖 [AGENT] {} exhausted {} steps, forcing a final answer",
            self.role, self.max_iter
        );
        messages.push(ChatMessage::user(FORCE_FINAL_ANSWER));
        let reply = llm
            .complete(
                ChatRequest {
                    messages,
                    tools: Vec::new(),
                },
                priority,
            )
            .await?;

        reply
            .answer()
            .map(str::to_string)
            .ok_or_else(|| CrewError::NoFinalAnswer {
                role: self.role.clone(),
                iterations: self.max_iter,
            })
    }
}

/// Execute one tool call. Failures become observation text for the model.
async fn run_tool(tools: &[Arc<dyn Tool>], call: &ToolCall) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
        let available: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        warn!("🔧 [TOOL] Unknown tool requested: {}", call.name);
        return format!(
            "Error: tool '{}' does not exist. Available tools: {}",
            call.name,
            available.join(", ")
        );
    };

    match tool.call(parse_arguments(&call.arguments)).await {
        Ok(output) => output,
        Err(e) => {
            warn!("🔧 [TOOL] {} failed: {}", call.name, e);
            format!("Error: {}", e)
        }
    }
}
