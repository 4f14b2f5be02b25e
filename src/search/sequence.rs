//! Monotonic request numbering. Only the newest ticket's response is applied.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue the next ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.latest
    }
}
