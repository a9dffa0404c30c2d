/// Holds at most one live timer handle.
///
/// Handles are expected to cancel themselves on drop (as
/// `gloo_timers::callback::Interval` does), so arming a new one always
/// tears down the one it supersedes.
#[derive(Debug)]
pub struct TimerSlot<H> {
    current: Option<H>,
}

impl<H> Default for TimerSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H> TimerSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handle`, dropping any previous one first. Returns true if a
    /// running timer was superseded.
    pub fn replace(&mut self, handle: H) -> bool {
        let superseded = self.cancel();
        self.current = Some(handle);
        superseded
    }

    /// Drops the live handle, if any.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                drop(handle);
                true
            }
            None => false,
        }
    }
}
