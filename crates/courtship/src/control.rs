use std::io::Write;
use std::os::unix::net::UnixStream;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/valentine.sock";

/// One line on the control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ControlCommand {
    Open,
    Reset,
    Suspend,
}

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Unknown control command '{0}'")]
    Unknown(String),
    #[error("Failed to connect to valentine at {path}: {source}. Is valentine running?")]
    Connect {
        path: &'static str,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_line(line: &str) -> Result<ControlCommand, ControlError> {
    let trimmed = line.trim();
    ControlCommand::from_str(trimmed).map_err(|_| ControlError::Unknown(trimmed.to_string()))
}

pub fn send(cmd: ControlCommand) -> Result<(), ControlError> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|source| ControlError::Connect {
        path: SOCKET_PATH,
        source,
    })?;
    writeln!(stream, "{}", cmd)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_line() {
        let cases = vec![
            ("open", ControlCommand::Open),
            ("  reset\n", ControlCommand::Reset),
            ("RESET", ControlCommand::Reset),
            ("Suspend", ControlCommand::Suspend),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_line(line).unwrap(), expected);
        }
        assert!(matches!(parse_line("dance"), Err(ControlError::Unknown(s)) if s == "dance"));
    }

    #[test]
    fn test_display_round_trips() {
        for cmd in ControlCommand::iter() {
            assert_eq!(parse_line(&cmd.to_string()).unwrap(), cmd);
        }
    }
}
