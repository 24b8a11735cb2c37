use std::time::Duration;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Cancellable timer bookkeeping. Each `arm` supersedes the previous one;
/// only the ticket of the last arm can fire.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    window: Duration,
    generation: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn arm(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    /// Called when a timer elapses. Yields the value only for the surviving ticket.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_last_armed_timer_fires() {
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        let first = debouncer.arm("r".to_string());
        let second = debouncer.arm("re".to_string());
        let third = debouncer.arm("ren".to_string());

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), None);
        assert_eq!(debouncer.fire(third), Some("ren".to_string()));
        assert_eq!(debouncer.fire(third), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let ticket = debouncer.arm(1);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.fire(ticket), None);
    }
}
