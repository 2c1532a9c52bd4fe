//! Prefix commands.

mod guards;
mod handlers;

pub use guards::{CommandGuard, DirectMessageOnly, GuardOutcome, RequireLinkedAccount, default_guards};
pub use handlers::{CommandError, handle_message};

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login,
    /// Redirect URL carrying the authorization code
    Connect(String),
    Account,
    Now,
    /// Resume without a query; search and pick with one.
    Play(Option<String>),
    Pause,
    Next,
    Previous,
    Queue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument, usage: {usage}")]
    MissingArgument { usage: &'static str },
}

impl Command {
    /// Parse `content` if it starts with `prefix`. Returns `None` for
    /// ordinary chat.
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, CommandParseError>> {
        let body = content.trim().strip_prefix(prefix)?;
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        if name.is_empty() {
            return None;
        }

        let argument = (!rest.is_empty()).then(|| rest.to_string());
        let command = match name.to_lowercase().as_str() {
            "help" => Ok(Self::Help),
            "login" => Ok(Self::Login),
            "connect" => argument
                .map(Self::Connect)
                .ok_or(CommandParseError::MissingArgument {
                    usage: "connect <url>",
                }),
            "account" => Ok(Self::Account),
            "now" => Ok(Self::Now),
            "play" => Ok(Self::Play(argument)),
            "pause" | "stop" => Ok(Self::Pause),
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            "queue" => argument
                .map(Self::Queue)
                .ok_or(CommandParseError::MissingArgument {
                    usage: "queue <query>",
                }),
            _ => Err(CommandParseError::Unknown(name.to_string())),
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Login => "login",
            Self::Connect(_) => "connect",
            Self::Account => "account",
            Self::Now => "now",
            Self::Play(_) => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Queue(_) => "queue",
        }
    }

    /// Whether the command acts on the invoker's streaming account.
    pub fn requires_link(&self) -> bool {
        !matches!(self, Self::Help | Self::Login | Self::Connect(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Option<Result<Command, CommandParseError>> {
        Command::parse("-", content)
    }

    #[test]
    fn test_ignores_unprefixed_messages() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("-"), None);
        assert_eq!(parse("- play"), None);
    }

    #[test]
    fn test_parses_commands_and_aliases() {
        assert_eq!(parse("-now"), Some(Ok(Command::Now)));
        assert_eq!(parse("-stop"), Some(Ok(Command::Pause)));
        assert_eq!(parse("-prev"), Some(Ok(Command::Previous)));
        assert_eq!(parse("-Play"), Some(Ok(Command::Play(None))));
        assert_eq!(
            parse("-play  daft   punk "),
            Some(Ok(Command::Play(Some("daft   punk".to_string()))))
        );
        assert_eq!(
            parse("-queue Daft Punk"),
            Some(Ok(Command::Queue("Daft Punk".to_string())))
        );
    }

    #[test]
    fn test_missing_and_unknown() {
        assert_eq!(
            parse("-queue"),
            Some(Err(CommandParseError::MissingArgument {
                usage: "queue <query>"
            }))
        );
        assert_eq!(
            parse("-connect"),
            Some(Err(CommandParseError::MissingArgument {
                usage: "connect <url>"
            }))
        );
        assert_eq!(
            parse("-shuffle"),
            Some(Err(CommandParseError::Unknown("shuffle".to_string())))
        );
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(Command::parse("!", "!next"), Some(Ok(Command::Next)));
        assert_eq!(Command::parse("!", "-next"), None);
    }

    #[test]
    fn test_link_requirement() {
        assert!(!Command::Login.requires_link());
        assert!(!Command::Connect("url".to_string()).requires_link());
        assert!(Command::Queue("q".to_string()).requires_link());
        assert!(Command::Play(None).requires_link());
    }
}
