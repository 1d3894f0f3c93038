use std::collections::VecDeque;

use itertools::Itertools;

/// Suppresses short-lived changes in a stream of discrete readings.
///
/// A reading becomes *confirmed* once it has been pushed `window` times in a row. Only changes of
/// the confirmed value are reported, so a steady reading is reported exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    history: VecDeque<T>,
    /// Number of identical consecutive readings required for confirmation.
    window: usize,
    initial: T,
    confirmed: T,
}

impl<T: Copy + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose confirmed value starts out as `initial`.
    ///
    /// # Panics
    ///
    /// This method panics if `window` is 0.
    pub fn new(window: usize, initial: T) -> Self {
        assert!(window > 0, "debounce window must not be empty");
        Self {
            history: VecDeque::with_capacity(window),
            window,
            initial,
            confirmed: initial,
        }
    }

    /// Adds a raw reading.
    ///
    /// Returns the new confirmed value if this reading caused it to change.
    pub fn push(&mut self, reading: T) -> Option<T> {
        self.history.push_back(reading);
        if self.history.len() > self.window {
            self.history.pop_front();
        }

        let stable = self.history.len() == self.window && self.history.iter().all_equal();
        if stable && reading != self.confirmed {
            self.confirmed = reading;
            Some(reading)
        } else {
            None
        }
    }

    /// The last confirmed value.
    #[inline]
    pub fn confirmed(&self) -> T {
        self.confirmed
    }

    /// The most recent raw reading, if any.
    pub fn latest(&self) -> Option<T> {
        self.history.back().copied()
    }

    /// How far the most recent reading is towards being confirmed, between 0.0 and 1.0.
    ///
    /// This is the length of the run of readings equal to the most recent one, divided by the
    /// window. A reading that is already confirmed and still held reports 1.0.
    pub fn progress(&self) -> f32 {
        let Some(latest) = self.latest() else {
            return 0.0;
        };
        let run = self
            .history
            .iter()
            .rev()
            .take_while(|&&reading| reading == latest)
            .count();
        (run as f32 / self.window as f32).min(1.0)
    }

    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Forgets all readings and restores the initial confirmed value.
    pub fn reset(&mut self) {
        self.history.clear();
        self.confirmed = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmations(window: usize, readings: &[u8]) -> Vec<u8> {
        let mut debouncer = Debouncer::new(window, 0);
        readings
            .iter()
            .filter_map(|&r| debouncer.push(r))
            .collect()
    }

    #[test]
    fn spurious_reading_is_ignored() {
        assert!(confirmations(4, &[2, 2, 2, 5, 2, 2, 2]).is_empty());
        assert_eq!(confirmations(4, &[2, 2, 2, 2, 5, 2, 2, 2]), [2]);
    }

    #[test]
    fn steady_reading_fires_once() {
        assert_eq!(confirmations(3, &[1; 20]), [1]);
    }

    #[test]
    fn transitions() {
        assert_eq!(confirmations(2, &[1, 1, 3, 3, 3, 1, 1]), [1, 3, 1]);
        // Returning to the initial value is a transition too.
        assert_eq!(confirmations(2, &[4, 4, 0, 0]), [4, 0]);
    }

    #[test]
    fn window_of_one() {
        assert_eq!(confirmations(1, &[1, 2, 2, 3]), [1, 2, 3]);
    }

    #[test]
    fn not_confirmed_until_window_fills() {
        let mut debouncer = Debouncer::new(3, None);
        assert_eq!(debouncer.push(Some(1)), None);
        assert_eq!(debouncer.push(Some(1)), None);
        assert_eq!(debouncer.confirmed(), None);
        assert_eq!(debouncer.latest(), Some(Some(1)));
        assert_eq!(debouncer.push(Some(1)), Some(Some(1)));
        assert_eq!(debouncer.confirmed(), Some(1));
    }

    #[test]
    fn progress() {
        let mut debouncer = Debouncer::new(4, false);
        assert_eq!(debouncer.progress(), 0.0);
        let mut seen = Vec::new();
        for _ in 0..4 {
            debouncer.push(true);
            seen.push(debouncer.progress());
        }
        assert_eq!(seen, [0.25, 0.5, 0.75, 1.0]);
        // Holding a confirmed reading stays at 1.0.
        debouncer.push(true);
        assert_eq!(debouncer.progress(), 1.0);

        // A different reading starts a new run.
        debouncer.push(false);
        assert_eq!(debouncer.progress(), 0.25);
        debouncer.push(true);
        assert_eq!(debouncer.progress(), 0.25);

        debouncer.reset();
        assert_eq!(debouncer.progress(), 0.0);
    }

    #[test]
    fn reset() {
        let mut debouncer = Debouncer::new(1, false);
        debouncer.push(true);
        assert!(debouncer.confirmed());
        debouncer.reset();
        assert!(!debouncer.confirmed());
        assert_eq!(debouncer.latest(), None);
    }
}
