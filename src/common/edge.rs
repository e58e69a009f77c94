//! Single-bit Edge Detector.
//!
//! Slaves on the bus are allowed to hold a completion signal high for more
//! than one cycle. Consumers that must see exactly one pulse per completed
//! transaction keep the previous-cycle level and only report the rising edge:
//! `pulse = level AND NOT previous`.

/// Stored previous-cycle level of a completion signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgePulse {
    previous: bool,
}

impl EdgePulse {
    /// Creates a detector whose previous level is low.
    pub fn new() -> Self {
        Self { previous: false }
    }

    /// Returns the level observed in the previous cycle.
    pub fn previous(&self) -> bool {
        self.previous
    }

    /// Returns `true` when `level` is high this cycle and was low last cycle.
    ///
    /// This is a pure query; the detector only advances through [`EdgePulse::advance`].
    #[inline]
    pub fn rising(&self, level: bool) -> bool {
        level && !self.previous
    }

    /// Returns the detector state for the next cycle after observing `level`.
    #[inline]
    pub fn advance(&self, level: bool) -> Self {
        Self { previous: level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_level_pulses_once() {
        let mut edge = EdgePulse::new();
        let mut pulses = 0;
        for _ in 0..4 {
            if edge.rising(true) {
                pulses += 1;
            }
            edge = edge.advance(true);
        }
        assert_eq!(pulses, 1);
    }

    #[test]
    fn toggled_level_pulses_every_other_cycle() {
        // ack_next = cyc AND NOT ack, with cyc held high
        let mut edge = EdgePulse::new();
        let mut trace = Vec::new();
        for _ in 0..4 {
            let ack = edge.previous();
            trace.push(ack);
            edge = edge.advance(edge.rising(true));
        }
        assert_eq!(trace, vec![false, true, false, true]);
    }
}
