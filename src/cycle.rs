//! Wake-cycle scheduling logic (hardware-independent)

/// Phases of one wake cycle, in execution order. `Sleep` is terminal: the
/// next cycle starts from power-on reset, not from saved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Acquire,
    Compute,
    Idle,
    Join,
    Transmit,
    Shutdown,
    Sleep,
}

/// Observable outcomes that drive the cycle forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    RailsUp,
    Measured,
    SensorFault,
    IndexReady,
    IndexUnsupported,
    Joined,
    JoinFailed,
    Sent,
    SendFailed,
    Done,
}

/// One wake cycle. Created fresh on every boot; instances never cross the
/// deep-sleep boundary.
pub struct Cycle {
    phase: Phase,
    networking: bool,
}

impl Cycle {
    /// `networking` reflects whether an access point is configured; it
    /// gates the Compute -> Join transition.
    pub fn new(networking: bool) -> Self {
        Self {
            phase: Phase::Init,
            networking,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance the cycle with an observed event and return the new phase.
    /// Events that do not apply to the current phase leave it unchanged.
    pub fn advance(&mut self, event: Event) -> Phase {
        use Event::*;
        use Phase::*;
        self.phase = match (self.phase, event) {
            (Init, RailsUp) => Acquire,
            (Acquire, Measured) => Compute,
            (Acquire, SensorFault) => Shutdown,
            (Compute, IndexReady) if self.networking => Join,
            (Compute, IndexReady) => Idle,
            (Compute, IndexUnsupported) => Shutdown,
            (Idle, Done) => Shutdown,
            (Join, Joined) => Transmit,
            (Join, JoinFailed) => Shutdown,
            (Transmit, Sent) | (Transmit, SendFailed) => Shutdown,
            (Shutdown, Done) => Sleep,
            (unchanged, _) => unchanged,
        };
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_networked_cycle() {
        let mut cycle = Cycle::new(true);
        assert_eq!(cycle.advance(Event::RailsUp), Phase::Acquire);
        assert_eq!(cycle.advance(Event::Measured), Phase::Compute);
        assert_eq!(cycle.advance(Event::IndexReady), Phase::Join);
        assert_eq!(cycle.advance(Event::Joined), Phase::Transmit);
        assert_eq!(cycle.advance(Event::Sent), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn empty_ssid_skips_join_and_transmit() {
        let mut cycle = Cycle::new(false);
        cycle.advance(Event::RailsUp);
        cycle.advance(Event::Measured);
        assert_eq!(cycle.advance(Event::IndexReady), Phase::Idle);
        assert_eq!(cycle.advance(Event::Done), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn unsupported_index_config_goes_straight_to_shutdown() {
        let mut cycle = Cycle::new(true);
        cycle.advance(Event::RailsUp);
        cycle.advance(Event::Measured);
        assert_eq!(cycle.advance(Event::IndexUnsupported), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn join_failure_skips_transmit() {
        let mut cycle = Cycle::new(true);
        cycle.advance(Event::RailsUp);
        cycle.advance(Event::Measured);
        cycle.advance(Event::IndexReady);
        assert_eq!(cycle.advance(Event::JoinFailed), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn send_failure_still_reaches_sleep() {
        let mut cycle = Cycle::new(true);
        cycle.advance(Event::RailsUp);
        cycle.advance(Event::Measured);
        cycle.advance(Event::IndexReady);
        cycle.advance(Event::Joined);
        assert_eq!(cycle.advance(Event::SendFailed), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn sensor_fault_goes_straight_to_shutdown() {
        let mut cycle = Cycle::new(true);
        cycle.advance(Event::RailsUp);
        assert_eq!(cycle.advance(Event::SensorFault), Phase::Shutdown);
        assert_eq!(cycle.advance(Event::Done), Phase::Sleep);
    }

    #[test]
    fn inapplicable_events_leave_phase_unchanged() {
        let mut cycle = Cycle::new(true);
        assert_eq!(cycle.advance(Event::Sent), Phase::Init);
        cycle.advance(Event::RailsUp);
        assert_eq!(cycle.advance(Event::Joined), Phase::Acquire);
    }
}
