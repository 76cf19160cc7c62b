/// # Acquisition Session State Machine
///
/// One value per acquisition session. The session's background thread owns
/// all transitions; the foreground only reads the state.
///
/// ## State Transition Diagram
///
/// ```text
///              start
///   ┌──────┐ ─────────► ┌────────────┐  open failed
///   │ Idle │            │ Connecting │ ──────────────┐
///   └──────┘ ◄───┐      └─────┬──────┘               │
///      ▲  ▲      │            │ opened               │
///      │  │      │      ┌─────▼─────┐                │
///      │  │      │      │  Reading  │                │
///      │  │      │      └──┬─────┬──┘                │
///      │  │      │   stop  │     │ read error        │
///      │  │  ┌───┴──────┐  │     │  ┌─────────┐      │
///      │  │  │ Stopping │◄─┘     └─►│ Errored │      │
///      │  │  └──────────┘           └────┬────┘      │
///      │  └──────────────────────────────┘           │
///      └─────────────────────────────────────────────┘
/// ```
///
/// ## State Invariants
///
/// - **Idle**: No connection held, session finished or never started
/// - **Connecting**: `open` in progress on the background thread
/// - **Reading**: Connection open, read loop running
/// - **Stopping**: Stop observed, connection being closed
/// - **Errored**: Read failed, connection being closed
///
/// Leaving `Reading` always closes the connection before `Idle` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SessionState {
    Idle,
    Connecting,
    Reading,
    Stopping,
    Errored,
}

impl SessionState {
    /// Does the session still hold (or is acquiring) the connection?
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Connecting | Self::Reading | Self::Stopping)
    }

    /// May the registry be cleared while the session is in this state?
    pub fn allows_clear(&self) -> bool {
        !matches!(self, Self::Connecting | Self::Reading)
    }

    /// Should the toggle button show "Stop"?
    pub fn button_shows_stop(&self) -> bool {
        matches!(self, Self::Connecting | Self::Reading)
    }

    /// Validate if transition to new_state is allowed from current state
    pub fn can_transition_to(&self, new_state: SessionState) -> bool {
        use SessionState::*;

        match (self, new_state) {
            (Idle, Connecting) => true, // start requested

            (Connecting, Reading) => true, // open succeeded
            (Connecting, Idle) => true,    // open failed

            (Reading, Stopping) => true, // stop observed
            (Reading, Errored) => true,  // read failed

            (Stopping, Idle) => true, // connection closed
            (Errored, Idle) => true,  // connection closed

            _ => false,
        }
    }

    /// Convert state to u8 value for atomic storage
    pub fn to_u8(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Connecting => 1,
            SessionState::Reading => 2,
            SessionState::Stopping => 3,
            SessionState::Errored => 4,
        }
    }

    /// Convert u8 value back to state. Returns None if value is invalid
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SessionState::Idle),
            1 => Some(SessionState::Connecting),
            2 => Some(SessionState::Reading),
            3 => Some(SessionState::Stopping),
            4 => Some(SessionState::Errored),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const ALL: [SessionState; 5] = [
        SessionState::Idle,
        SessionState::Connecting,
        SessionState::Reading,
        SessionState::Stopping,
        SessionState::Errored,
    ];

    #[test]
    fn test_state_conversion_roundtrip() {
        for state in ALL {
            assert_eq!(SessionState::from_u8(state.to_u8()), Some(state));
        }
        assert_eq!(SessionState::from_u8(9), None);
    }

    #[test]
    fn test_valid_transitions() {
        assert!(SessionState::Idle.can_transition_to(SessionState::Connecting));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Reading));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Idle));
        assert!(SessionState::Reading.can_transition_to(SessionState::Stopping));
        assert!(SessionState::Reading.can_transition_to(SessionState::Errored));
        assert!(SessionState::Stopping.can_transition_to(SessionState::Idle));
        assert!(SessionState::Errored.can_transition_to(SessionState::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        // Reading can only be entered through Connecting
        assert!(!SessionState::Idle.can_transition_to(SessionState::Reading));
        // Reading never returns to Idle without closing first
        assert!(!SessionState::Reading.can_transition_to(SessionState::Idle));
        assert!(!SessionState::Errored.can_transition_to(SessionState::Reading));
        for state in ALL {
            assert!(!state.can_transition_to(state), "{:?} self-loop", state);
        }
    }

    #[test]
    fn test_clear_rules() {
        assert!(SessionState::Idle.allows_clear());
        assert!(!SessionState::Connecting.allows_clear());
        assert!(!SessionState::Reading.allows_clear());
        assert!(SessionState::Errored.allows_clear());
    }

    #[test]
    fn test_serialization() {
        let state = SessionState::Reading;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
