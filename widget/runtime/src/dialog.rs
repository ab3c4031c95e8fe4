/// Dialog state of the widget.
///
/// The tagged union rules out the impossible flag combinations (closed yet
/// sending-visible, etc.); transitions are pure functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open { sending: bool },
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open { .. })
    }

    pub fn is_sending(&self) -> bool {
        matches!(self, DialogState::Open { sending: true })
    }

    /// Flip open/closed. Reopening while a send is still in flight shows
    /// the dialog back in its sending state.
    pub fn toggled(self, send_in_flight: bool) -> Self {
        match self {
            DialogState::Closed => DialogState::Open {
                sending: send_in_flight,
            },
            DialogState::Open { .. } => DialogState::Closed,
        }
    }

    /// Force-close, regardless of current state.
    pub fn closed(self) -> Self {
        DialogState::Closed
    }

    /// Whether a new submission may start from this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, DialogState::Open { sending: false })
    }

    /// Record that a send started or settled, without touching visibility.
    pub fn with_sending(self, sending: bool) -> Self {
        match self {
            DialogState::Closed => DialogState::Closed,
            DialogState::Open { .. } => DialogState::Open { sending },
        }
    }
}
