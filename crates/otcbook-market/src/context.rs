//! Per-call execution context.

use otcbook_types::{Address, Amount, Timestamp};

/// Who is calling, how much native value they attached, and the clock the
/// call observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Native value attached to the call. Moved into custody only when the
    /// operation accepts it.
    pub value: Amount,
    pub now: Timestamp,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self {
            caller,
            value: 0,
            now,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}
