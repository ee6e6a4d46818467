//! A small multi-agent orchestrator: agents, tasks and the crew that runs them.

pub mod agent;
pub mod delegation;
pub mod interpolate;
pub mod task;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};

use crate::constants;
use crate::error::CrewError;
use crate::llm::{LLMQueue, Priority};

pub use agent::Agent;
pub use delegation::delegation_tools;
pub use interpolate::interpolate;
pub use task::Task;

/// How tasks are assigned to agents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// A manager agent delegates every task to the crew
    #[default]
    Hierarchical,
    /// Each task runs directly on its assigned agent
    Sequential,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskOutput {
    pub description: String,
    pub agent: String,
    pub raw: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrewOutput {
    /// Output of the last task
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
}

pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    process: Process,
    manager_max_iter: usize,
    llm: LLMQueue,
}

impl Crew {
    pub fn new(
        agents: Vec<Agent>,
        tasks: Vec<Task>,
        process: Process,
        llm: LLMQueue,
    ) -> Result<Self, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }
        for (i, task) in tasks.iter().enumerate() {
            if !agents.iter().any(|a| a.matches_role(&task.agent)) {
                return Err(CrewError::UnknownAgent {
                    task: i,
                    role: task.agent.clone(),
                });
            }
            if let Some(&bad) = task.context.iter().find(|&&c| c >= i) {
                return Err(CrewError::InvalidContext {
                    task: i,
                    context: bad,
                });
            }
        }

        Ok(Self {
            agents,
            tasks,
            process,
            manager_max_iter: constants::crew::MANAGER_MAX_ITER,
            llm,
        })
    }

    pub fn with_manager_max_iter(mut self, max_iter: usize) -> Self {
        self.manager_max_iter = max_iter.max(1);
        self
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn manager(&self) -> Agent {
        Agent::new(
            constants::crew::MANAGER_ROLE,
            "Manage the team to complete the task in the best way possible.",
            "You are a seasoned manager who gets the best out of your team. \
             You never do the work yourself: you delegate each piece of work to the right coworker, \
             ask the right questions, and critically review what they deliver before answering.",
        )
        .with_max_iter(self.manager_max_iter)
    }

    /// Run every task in order with `inputs` substituted into agent and task text.
    pub async fn kickoff(&self, inputs: &HashMap<String, String>) -> Result<CrewOutput, CrewError> {
        let agents = self
            .agents
            .iter()
            .map(|a| a.interpolated(inputs))
            .collect::<Result<Vec<_>, _>>()?;
        let tasks = self
            .tasks
            .iter()
            .map(|t| t.interpolated(inputs))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "🚀 [CREW] Kickoff: {} agents, {} tasks, {:?} process",
            agents.len(),
            tasks.len(),
            self.process
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(tasks.len());

        for (i, task) in tasks.iter().enumerate() {
            let context = task_context(task, i, &outputs);
            let prompt = task.prompt(context.as_deref());

            let assigned = agents
                .iter()
                .find(|a| a.matches_role(&task.agent))
                .ok_or_else(|| CrewError::UnknownAgent {
                    task: i,
                    role: task.agent.clone(),
                })?;

            let span = info_span!("task", index = i, agent = %assigned.role);
            let raw = async {
                info!("📋 [CREW] Task {}/{} for {}", i + 1, tasks.len(), assigned.role);
                match self.process {
                    Process::Sequential => {
                        let extra = if assigned.allow_delegation {
                            let coworkers = agents
                                .iter()
                                .filter(|a| !a.matches_role(&assigned.role))
                                .cloned()
                                .collect();
                            delegation_tools(coworkers, &self.llm)
                        } else {
                            Vec::new()
                        };
                        assigned
                            .execute(&prompt, &extra, &self.llm, Priority::Normal)
                            .await
                    }
                    Process::Hierarchical => {
                        let tools = delegation_tools(agents.clone(), &self.llm);
                        let prompt = format!(
                            "{}\n\nThe coworker best suited for this task is: {}",
                            prompt, assigned.role
                        );
                        self.manager()
                            .execute(&prompt, &tools, &self.llm, Priority::Normal)
                            .await
                    }
                }
            }
            .instrument(span)
            .await?;

            outputs.push(TaskOutput {
                description: task.description.clone(),
                agent: assigned.role.clone(),
                raw,
            });
        }

        let raw = outputs
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();

        info!("🏁 [CREW] Finished {} tasks", outputs.len());
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }
}

/// Outputs of the listed context tasks, or of every earlier task when none are listed.
fn task_context(task: &Task, index: usize, outputs: &[TaskOutput]) -> Option<String> {
    let selected: Vec<&TaskOutput> = if task.context.is_empty() {
        outputs.iter().take(index).collect()
    } else {
        task.context.iter().filter_map(|&c| outputs.get(c)).collect()
    };

    if selected.is_empty() {
        return None;
    }

    Some(
        selected
            .iter()
            .map(|o| o.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n\n----------\n\n"),
    )
}
