use std::fmt;

/// Action keyword of an inbound command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Status,
    Stats,
    Start,
    Stop,
    Restart,
    Logs,
    Help,
    Unknown(String),
}

impl Action {
    /// Case-folded keyword lookup; anything unrecognised is kept as `Unknown`.
    pub fn parse(keyword: &str) -> Self {
        let folded = keyword.to_lowercase();
        match folded.as_str() {
            "status" => Self::Status,
            "stats" => Self::Stats,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "restart" => Self::Restart,
            "logs" => Self::Logs,
            "help" => Self::Help,
            _ => Self::Unknown(folded),
        }
    }

    /// Whether the action operates on a single named container
    pub fn needs_container(&self) -> bool {
        matches!(self, Self::Start | Self::Stop | Self::Restart | Self::Logs)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Status => "status",
            Self::Stats => "stats",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Logs => "logs",
            Self::Help => "help",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `<action> [<container_name>]` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub container: Option<String>,
}

impl Command {
    /// Reads the first two whitespace-separated tokens; extra tokens are ignored.
    /// Returns `None` when there is no action token at all.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let action = Action::parse(tokens.next()?);
        let container = tokens.next().map(str::to_string);
        Some(Self { action, container })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_case_folds() {
        assert_eq!(Action::parse("STATUS"), Action::Status);
        assert_eq!(Action::parse("Logs"), Action::Logs);
        assert_eq!(Action::parse("Dance"), Action::Unknown("dance".to_string()));
    }

    #[test]
    fn test_parse_command_with_container() {
        let command = Command::parse("  restart   minecraft extra").unwrap();
        assert_eq!(command.action, Action::Restart);
        assert_eq!(command.container.as_deref(), Some("minecraft"));
    }

    #[test]
    fn test_parse_command_without_container() {
        let command = Command::parse("stats").unwrap();
        assert_eq!(command.action, Action::Stats);
        assert!(command.container.is_none());
    }

    #[test]
    fn test_parse_empty_command() {
        assert!(Command::parse("   ").is_none());
    }

    #[test]
    fn test_needs_container() {
        assert!(Action::Start.needs_container());
        assert!(Action::Logs.needs_container());
        assert!(!Action::Status.needs_container());
        assert!(!Action::Help.needs_container());
    }
}
