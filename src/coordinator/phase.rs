use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Coordinator state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    /// Shut down; nothing in flight
    Idle = 0,
    /// Connectivity probe in flight
    Probing = 1,
    /// Connected and accepting predictions
    Ready = 2,
    /// Last probe failed
    Disconnected = 3,
    /// A predict call is in flight
    Submitting = 4,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::Probing,
            2 => Phase::Ready,
            3 => Phase::Disconnected,
            4 => Phase::Submitting,
            _ => Phase::Idle,
        }
    }
}

/// Atomic cell holding the current phase
#[derive(Debug)]
pub(crate) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn new(phase: Phase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    pub fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn store(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::SeqCst);
    }

    /// Move `from -> to`; on mismatch returns the phase actually held
    pub fn transition(&self, from: Phase, to: Phase) -> Result<(), Phase> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(Phase::from_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_rejects_wrong_source() {
        let cell = PhaseCell::new(Phase::Probing);
        assert_eq!(cell.transition(Phase::Ready, Phase::Submitting), Err(Phase::Probing));
        assert_eq!(cell.load(), Phase::Probing);

        cell.store(Phase::Ready);
        assert_eq!(cell.transition(Phase::Ready, Phase::Submitting), Ok(()));
        assert_eq!(cell.transition(Phase::Ready, Phase::Submitting), Err(Phase::Submitting));
    }
}
