use courtship::control::ControlCommand;

/// Events arriving from the background runtime.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Open,
    Reset,
    Suspend,
    ConfigReload,
}

impl From<ControlCommand> for AppEvent {
    fn from(cmd: ControlCommand) -> Self {
        match cmd {
            ControlCommand::Open => AppEvent::Open,
            ControlCommand::Reset => AppEvent::Reset,
            ControlCommand::Suspend => AppEvent::Suspend,
        }
    }
}
