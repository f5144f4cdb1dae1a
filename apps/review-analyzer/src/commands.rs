/// Command typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze,
    /// `None` clears the token.
    Token(Option<String>),
    Reload,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line; an empty line triggers an analysis.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "a" | "analyze" => Ok(Command::Analyze),
            "token" | "t" if rest.is_empty() => Ok(Command::Token(None)),
            "token" | "t" => Ok(Command::Token(Some(rest.to_string()))),
            "reload" | "r" => Ok(Command::Reload),
            "status" | "s" => Ok(Command::Status),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(line.to_string()),
        }
    }
}

pub const HELP: &str = "Commands:
  <enter> | analyze   pick a random review and analyze it
  token <value>       use a bearer token for the following requests
  token               clear the bearer token
  reload              load the dataset again
  status              show dataset and analysis status
  help                show this help
  quit                exit";
