use strum::Display as StrumDisplay;

/// Which modal is showing. A single enum so two modals can never be open at
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PopupState {
    #[default]
    None,
    Decline,
    Accept,
}

#[derive(Debug, Default)]
pub struct PopupLifecycle {
    state: PopupState,
}

impl PopupLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PopupState::None
    }

    pub fn open_decline(&mut self) -> bool {
        self.open(PopupState::Decline)
    }

    pub fn open_accept(&mut self) -> bool {
        self.open(PopupState::Accept)
    }

    fn open(&mut self, popup: PopupState) -> bool {
        if self.state != PopupState::None {
            return false;
        }
        self.state = popup;
        true
    }

    /// Clears the popup and reports which one was showing.
    pub fn close(&mut self) -> PopupState {
        std::mem::take(&mut self.state)
    }
}
