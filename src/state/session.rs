//! Process lifetime state shared by every screen controller.

use std::sync::atomic::{AtomicBool, Ordering};

/// Lives as long as the process; create one and hand it to each controller.
#[derive(Debug, Default)]
pub struct Session {
    update_check_ran: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the single update check of this session.
    ///
    /// Returns `true` for the first caller only.
    pub fn claim_update_check(&self) -> bool {
        !self.update_check_ran.swap(true, Ordering::AcqRel)
    }

    pub fn update_check_ran(&self) -> bool {
        self.update_check_ran.load(Ordering::Acquire)
    }
}
