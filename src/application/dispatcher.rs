use std::sync::Arc;

use rand::seq::SliceRandom;

use super::engine::{CommandEngine, CommandError};
use crate::domain::{Action, Command};

pub const INVALID_FORMAT: &str = "Invalid command format. Type `help` for instructions.";

pub const HELP_TEXT: &str = "**Available Commands:**\n\
- `status`: Shows the status of all monitored containers.\n\
- `stats`: Shows CPU, memory, network and block I/O usage of all monitored containers.\n\
- `start <container_name>`: Starts the specified container.\n\
- `stop <container_name>`: Stops the specified container.\n\
- `restart <container_name>`: Restarts the specified container.\n\
- `logs <container_name>`: Fetches the last 30 lines of logs for the specified container.\n\
- `help`: Shows this message.";

/// Built-in replies for unrecognised commands
pub const DEFAULT_FLAVOR_LINES: &[&str] = &[
    "Beep boop. That is not a command I was built to understand.",
    "I manage containers, not mysteries. Try `help`.",
    "The fleet hums along, ignoring your request entirely.",
    "Command not found. Have you tried turning it off and on again? Use `restart`.",
    "My sockets are open but my vocabulary is limited.",
];

/// Reply shape as sent back to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Plain(String),
    Block(String),
}

impl Reply {
    /// Text as it should appear in the channel
    pub fn render(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Block(text) => format!("```\n{}\n```", text),
        }
    }
}

/// Routes a mention-stripped command line to the engine and shapes the reply
pub struct Dispatcher {
    engine: Arc<CommandEngine>,
    flavor_lines: Vec<String>,
}

impl Dispatcher {
    pub fn new(engine: Arc<CommandEngine>, flavor_lines: Vec<String>) -> Self {
        let flavor_lines = if flavor_lines.is_empty() {
            DEFAULT_FLAVOR_LINES.iter().map(|l| l.to_string()).collect()
        } else {
            flavor_lines
        };
        Self { engine, flavor_lines }
    }

    pub async fn dispatch(&self, text: &str) -> Reply {
        let Some(command) = Command::parse(text) else {
            return Reply::Plain(INVALID_FORMAT.to_string());
        };
        let action = &command.action;

        match action {
            Action::Help => return Reply::Plain(HELP_TEXT.to_string()),
            Action::Unknown(_) => return Reply::Plain(self.flavor_line()),
            _ => {}
        }

        let container = if action.needs_container() {
            match command.container.as_deref() {
                Some(name) => Some(name),
                None => return Reply::Plain(missing_name_prompt(action)),
            }
        } else {
            None
        };

        match self.engine.execute(action, container).await {
            Ok(text) if replies_in_block(action) => Reply::Block(text),
            Ok(text) => Reply::Plain(text),
            Err(e) => Reply::Plain(e.to_string()),
        }
    }

    fn flavor_line(&self) -> String {
        self.flavor_lines
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Actions whose successful output is sent inside a code block
fn replies_in_block(action: &Action) -> bool {
    matches!(action, Action::Status | Action::Stats | Action::Logs)
}

fn missing_name_prompt(action: &Action) -> String {
    match action {
        Action::Logs => "Please specify a container name to fetch logs.".to_string(),
        other => CommandError::MissingName(other.to_string()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryRuntime;
    use crate::domain::{ContainerStatus, ContainerTarget, TargetRegistry};

    fn dispatcher(runtime: MemoryRuntime) -> (Dispatcher, Arc<MemoryRuntime>) {
        let registry = Arc::new(
            TargetRegistry::new(vec![ContainerTarget::new("web", "10.0.0.5", "80", "x")]).unwrap(),
        );
        let runtime = Arc::new(runtime);
        let engine = Arc::new(CommandEngine::new(registry, runtime.clone()));
        (Dispatcher::new(engine, Vec::new()), runtime)
    }

    #[tokio::test]
    async fn test_empty_command_is_invalid() {
        let (dispatcher, _) = dispatcher(MemoryRuntime::new());
        assert_eq!(dispatcher.dispatch("  ").await, Reply::Plain(INVALID_FORMAT.to_string()));
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let (dispatcher, _) = dispatcher(MemoryRuntime::new());
        let Reply::Plain(text) = dispatcher.dispatch("HELP").await else {
            panic!("help should be plain text");
        };
        for keyword in ["status", "stats", "start", "stop", "restart", "logs", "help"] {
            assert!(text.contains(&format!("`{}", keyword)), "missing {}", keyword);
        }
    }

    #[tokio::test]
    async fn test_status_is_wrapped_in_block() {
        let (dispatcher, _) = dispatcher(MemoryRuntime::new());
        let reply = dispatcher.dispatch("status").await;

        assert!(matches!(reply, Reply::Block(_)));
        let rendered = reply.render();
        assert!(rendered.starts_with("```\n+---"));
        assert!(rendered.ends_with("\n```"));
    }

    #[tokio::test]
    async fn test_stats_is_wrapped_in_block() {
        let (dispatcher, _) = dispatcher(MemoryRuntime::new().with_container("web", ContainerStatus::Running));
        let reply = dispatcher.dispatch("stats").await;

        assert!(matches!(reply, Reply::Block(_)));
        let rendered = reply.render();
        assert!(rendered.starts_with("```\nNAME"));
        assert!(rendered.ends_with("\n```"));
    }

    #[tokio::test]
    async fn test_logs_are_wrapped_in_block() {
        let (dispatcher, _) = dispatcher(
            MemoryRuntime::new()
                .with_container("web", ContainerStatus::Running)
                .with_logs("web", vec!["booting".to_string(), "ready".to_string()]),
        );

        let reply = dispatcher.dispatch("logs web").await;

        assert_eq!(reply, Reply::Block("booting\nready".to_string()));
        assert_eq!(reply.render(), "```\nbooting\nready\n```");
    }

    #[tokio::test]
    async fn test_unreachable_runtime_reply_is_plain() {
        let (dispatcher, _) = dispatcher(MemoryRuntime::unreachable());

        for command in ["status", "stats"] {
            let Reply::Plain(text) = dispatcher.dispatch(command).await else {
                panic!("{} error should be plain text", command);
            };
            assert!(text.starts_with("Unable to reach the container runtime:"));
        }
    }

    #[tokio::test]
    async fn test_logs_error_is_plain() {
        let (dispatcher, runtime) = dispatcher(MemoryRuntime::new());

        assert_eq!(
            dispatcher.dispatch("logs ghost").await,
            Reply::Plain(
                "Container 'ghost' is not in the list of monitored containers or may be misspelled."
                    .to_string()
            )
        );
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle_reply_is_plain() {
        let (dispatcher, runtime) = dispatcher(MemoryRuntime::new().with_container("web", ContainerStatus::Running));

        let reply = dispatcher.dispatch("Stop web").await;

        assert_eq!(reply, Reply::Plain("Container 'web' stopped successfully.".to_string()));
        assert_eq!(runtime.mutations(), vec!["stop:web"]);
    }

    #[tokio::test]
    async fn test_lifecycle_without_name_prompts() {
        let (dispatcher, runtime) = dispatcher(MemoryRuntime::new());

        assert_eq!(
            dispatcher.dispatch("restart").await,
            Reply::Plain("Please specify a container name for the 'restart' command.".to_string())
        );
        assert_eq!(
            dispatcher.dispatch("logs").await,
            Reply::Plain("Please specify a container name to fetch logs.".to_string())
        );
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_gets_flavor_text() {
        let (dispatcher, runtime) = dispatcher(MemoryRuntime::new());

        let Reply::Plain(text) = dispatcher.dispatch("dance web").await else {
            panic!("flavor text should be plain");
        };

        assert!(DEFAULT_FLAVOR_LINES.contains(&text.as_str()));
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_flavor_lines_replace_defaults() {
        let registry = Arc::new(TargetRegistry::default());
        let engine = Arc::new(CommandEngine::new(registry, Arc::new(MemoryRuntime::new())));
        let dispatcher = Dispatcher::new(engine, vec!["only line".to_string()]);

        assert_eq!(dispatcher.dispatch("???").await, Reply::Plain("only line".to_string()));
    }
}
