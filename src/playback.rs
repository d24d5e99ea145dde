use std::sync::Arc;

/// Fixed playback tick period.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Timer request handed to the owning view; the view runs (and on teardown
/// cancels) the actual repeating task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start { interval_ms: u64 },
    Stop,
}

/// Steps a discrete date index over an ordered, distinct, ascending date
/// sequence. The only mutators are the controls below and the owner's tick.
#[derive(Debug, Clone, Default)]
pub struct Playback {
    dates: Vec<Arc<str>>,
    index: usize,
    playing: bool,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline] pub fn is_playing(&self) -> bool { self.playing }

    #[inline] pub fn dates(&self) -> &[Arc<str>] { &self.dates }

    #[inline] pub fn index(&self) -> usize { self.index }

    /// The date under the cursor; `None` until a sequence is available.
    pub fn current_date(&self) -> Option<&Arc<str>> {
        self.dates.get(self.index)
    }

    /// Replace the date sequence (sorted and deduplicated here). A cursor
    /// that no longer fits resets to the most recent date; a still-valid
    /// cursor is kept.
    pub fn set_dates(&mut self, mut dates: Vec<Arc<str>>) {
        dates.sort();
        dates.dedup();
        let fresh = self.dates.is_empty();
        self.dates = dates;
        if self.dates.is_empty() {
            self.index = 0;
        } else if fresh || self.index >= self.dates.len() {
            self.index = self.dates.len() - 1;
        }
    }

    /// Stopped -> Playing. Idempotent: a second call while already playing
    /// requests no second timer.
    pub fn play(&mut self) -> Option<TimerCommand> {
        if self.playing || self.dates.is_empty() {
            return None;
        }
        self.playing = true;
        Some(TimerCommand::Start { interval_ms: TICK_INTERVAL_MS })
    }

    /// Playing -> Stopped; cancels the tick.
    pub fn pause(&mut self) -> Option<TimerCommand> {
        if !self.playing {
            return None;
        }
        self.playing = false;
        Some(TimerCommand::Stop)
    }

    /// One timer tick: advance modulo the sequence length (continuous loop).
    /// Ticks landing after a pause are ignored.
    pub fn tick(&mut self) {
        if self.playing && !self.dates.is_empty() {
            self.index = (self.index + 1) % self.dates.len();
        }
    }

    /// Direct cursor manipulation; keeps the current play/pause state.
    pub fn scrub(&mut self, index: usize) {
        if !self.dates.is_empty() {
            self.index = index.min(self.dates.len() - 1);
        }
    }

    /// Force the cursor to the most recent date (drill-down always shows
    /// "now").
    pub fn jump_to_latest(&mut self) {
        if !self.dates.is_empty() {
            self.index = self.dates.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<Arc<str>> {
        (1..=n).map(|d| Arc::<str>::from(format!("2024-01-{d:02}"))).collect()
    }

    #[test]
    fn n_ticks_advance_modulo_length() {
        let mut pb = Playback::new();
        pb.set_dates(dates(5));
        pb.scrub(2);
        pb.play();
        for _ in 0..7 {
            pb.tick();
        }
        assert_eq!(pb.index(), (2 + 7) % 5);
    }

    #[test]
    fn playback_wraps_from_last_to_first() {
        let mut pb = Playback::new();
        pb.set_dates(dates(3));
        assert_eq!(pb.index(), 2); // starts at the most recent date
        pb.play();
        pb.tick();
        assert_eq!(pb.index(), 0);
    }

    #[test]
    fn play_is_idempotent() {
        let mut pb = Playback::new();
        pb.set_dates(dates(3));
        assert_eq!(pb.play(), Some(TimerCommand::Start { interval_ms: TICK_INTERVAL_MS }));
        assert_eq!(pb.play(), None); // no second timer
        assert_eq!(pb.pause(), Some(TimerCommand::Stop));
        assert_eq!(pb.pause(), None);
    }

    #[test]
    fn play_without_dates_does_nothing() {
        let mut pb = Playback::new();
        assert_eq!(pb.play(), None);
        assert!(!pb.is_playing());
        pb.tick();
        assert_eq!(pb.current_date(), None);
    }

    #[test]
    fn scrub_keeps_playing_state() {
        let mut pb = Playback::new();
        pb.set_dates(dates(4));
        pb.play();
        pb.scrub(1);
        assert!(pb.is_playing());
        assert_eq!(pb.index(), 1);
        pb.scrub(99); // clamped, not a crash
        assert_eq!(pb.index(), 3);
    }

    #[test]
    fn shrinking_the_sequence_resets_to_last() {
        let mut pb = Playback::new();
        pb.set_dates(dates(10));
        pb.scrub(9);
        pb.set_dates(dates(4));
        assert_eq!(pb.index(), 3);
    }

    #[test]
    fn still_valid_cursor_survives_replacement() {
        let mut pb = Playback::new();
        pb.set_dates(dates(5));
        pb.scrub(1);
        pb.set_dates(dates(8));
        assert_eq!(pb.index(), 1);
    }

    #[test]
    fn ticks_after_pause_are_ignored() {
        let mut pb = Playback::new();
        pb.set_dates(dates(3));
        pb.play();
        pb.tick();
        pb.pause();
        let at = pb.index();
        pb.tick();
        assert_eq!(pb.index(), at);
    }

    #[test]
    fn duplicate_dates_collapse() {
        let mut pb = Playback::new();
        pb.set_dates(vec!["2024-01-02".into(), "2024-01-01".into(), "2024-01-02".into()]);
        let dates: Vec<&str> = pb.dates().iter().map(|d| &**d).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
    }
}
