use anyhow::Result;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Identifies one render request. A later ticket supersedes every earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Last-request-wins ordering between parameter changes and finished renders.
///
/// Every change takes a ticket. A result is published only while its ticket is
/// the newest one issued, and never after a newer result has been published,
/// so a slow run for stale parameters cannot overwrite a newer chart.
#[derive(Debug, Default)]
pub struct RenderSession {
    issued: AtomicU64,
    // Ticket id of the last published result; 0 before the first publish.
    published: Mutex<u64>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request, superseding all outstanding ones.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Runs `publish` for `ticket` unless it has been superseded.
    ///
    /// Returns `Ok(false)` when the result was discarded as stale.
    pub fn commit<F>(&self, ticket: Ticket, publish: F) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        let mut published = self
            .published
            .lock()
            .map_err(|_| anyhow::anyhow!("render session lock poisoned"))?;

        if ticket.0 <= *published || !self.is_current(ticket) {
            debug!(
                "Ticket {} is stale (latest issued {}, published {})",
                ticket.0,
                self.issued.load(Ordering::SeqCst),
                *published
            );
            return Ok(false);
        }

        publish()?;
        *published = ticket.0;
        Ok(true)
    }

    /// Id of the last published ticket, if any.
    pub fn published(&self) -> Option<u64> {
        match self.published.lock() {
            Ok(guard) if *guard > 0 => Some(*guard),
            _ => None,
        }
    }
}
