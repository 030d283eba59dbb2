use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle of a game loop.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LoopPhase {
    #[default]
    Idle,
    Running,
    /// Terminal.
    Stopped,
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopPhase::Idle => "idle",
            LoopPhase::Running => "running",
            LoopPhase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Cloneable handle that ends a running loop.
///
/// The loop owns one; callbacks and native-event shims receive clones. Stopping
/// is cooperative: the loop notices at the top of its next iteration.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    phase: Rc<Cell<LoopPhase>>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop.
    ///
    /// Returns `true` only for the call that performed `Running → Stopped`;
    /// repeated calls and calls on an idle loop change nothing.
    pub fn stop(&self) -> bool {
        if self.phase.get() == LoopPhase::Running {
            self.phase.set(LoopPhase::Stopped);
            true
        } else {
            false
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase.get()
    }

    pub fn is_running(&self) -> bool {
        self.phase.get() == LoopPhase::Running
    }

    /// `Idle → Running`. A stopped loop never runs again.
    pub(crate) fn start(&self) -> bool {
        if self.phase.get() == LoopPhase::Idle {
            self.phase.set(LoopPhase::Running);
            true
        } else {
            false
        }
    }

    /// Forces the terminal phase, including from `Idle`.
    pub(crate) fn finish(&self) {
        self.phase.set(LoopPhase::Stopped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent_and_terminal() {
        let handle = StopHandle::new();
        let shim = handle.clone();

        assert!(!shim.stop(), "idle loop ignores stop");
        assert_eq!(handle.phase(), LoopPhase::Idle);

        assert!(handle.start());
        assert!(shim.is_running());

        assert!(shim.stop());
        assert!(!shim.stop());
        assert_eq!(handle.phase(), LoopPhase::Stopped);

        assert!(!handle.start(), "no resurrection");
    }
}
