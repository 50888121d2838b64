//! Host commands.

use crate::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A command the host can send to a looper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin recording, discarding prior events.
    Record,
    /// Halt recording or playback.
    Stop,
    /// Loop the current buffer (no-op if empty).
    Play,
    Save(PathBuf),
    Load(PathBuf),
}

impl FromStr for Command {
    type Err = Error;

    /// Parse `record`, `stop`, `play`, `save <path>` or `load <path>`.
    ///
    /// Everything after the selector is the path, so paths may contain
    /// spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (selector, argument) = match s.split_once(char::is_whitespace) {
            Some((selector, rest)) => (selector, rest.trim()),
            None => (s, ""),
        };

        let path = |name: &'static str| {
            if argument.is_empty() {
                Err(Error::MissingArgument(name))
            } else {
                Ok(PathBuf::from(argument))
            }
        };

        match selector {
            "record" => Ok(Command::Record),
            "stop" => Ok(Command::Stop),
            "play" => Ok(Command::Play),
            "save" => path("save").map(Command::Save),
            "load" => path("load").map(Command::Load),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Record => f.write_str("record"),
            Command::Stop => f.write_str("stop"),
            Command::Play => f.write_str("play"),
            Command::Save(path) => write!(f, "save {}", path.display()),
            Command::Load(path) => write!(f, "load {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!("record".parse::<Command>().unwrap(), Command::Record);
        assert_eq!("  stop ".parse::<Command>().unwrap(), Command::Stop);
        assert_eq!("play".parse::<Command>().unwrap(), Command::Play);
    }

    #[test]
    fn test_parse_path_commands() {
        assert_eq!(
            "save /tmp/take one.txt".parse::<Command>().unwrap(),
            Command::Save(PathBuf::from("/tmp/take one.txt"))
        );
        assert_eq!(
            "load\ttake.txt".parse::<Command>().unwrap(),
            Command::Load(PathBuf::from("take.txt"))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "save".parse::<Command>(),
            Err(Error::MissingArgument("save"))
        ));
        assert!(matches!(
            "load   ".parse::<Command>(),
            Err(Error::MissingArgument("load"))
        ));
        assert!(matches!(
            "rewind".parse::<Command>(),
            Err(Error::UnknownCommand(name)) if name == "rewind"
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for command in [
            Command::Record,
            Command::Stop,
            Command::Play,
            Command::Save(PathBuf::from("a.txt")),
            Command::Load(PathBuf::from("dir/b.txt")),
        ] {
            assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
        }
    }
}
