//! Ordering of request completions.
//!
//! Every request is tagged with a [`Ticket`] carrying a global sequence number. A
//! completion is applied only if it is newer than everything already applied in its
//! lane and newer than the lane's invalidation floor.

use std::collections::HashMap;

use invex_client::RemoteFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Upload,
    Extraction,
    Preview,
    Chat,
    Tables,
    Summary,
    Fraud,
    /// One lane per backend format, so a PDF and a DOCX export never shadow each other.
    Export(RemoteFormat),
}

impl Lane {
    /// Lanes whose results belong to a specific document.
    pub const DOCUMENT_BOUND: [Lane; 3] = [Lane::Extraction, Lane::Preview, Lane::Tables];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub lane: Lane,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SequenceGuard {
    last_issued: u64,
    applied: HashMap<Lane, u64>,
    floor: HashMap<Lane, u64>,
}

impl SequenceGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, lane: Lane) -> Ticket {
        self.last_issued += 1;
        Ticket {
            lane,
            seq: self.last_issued,
        }
    }

    /// Whether `ticket` is the newest applicable completion of its lane.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let applied = self.applied.get(&ticket.lane).copied().unwrap_or(0);
        let floor = self.floor.get(&ticket.lane).copied().unwrap_or(0);
        ticket.seq > applied && ticket.seq > floor
    }

    /// Record `ticket` as applied if it is current. Returns whether the caller may
    /// apply the completion.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.applied.insert(ticket.lane, ticket.seq);
        true
    }

    /// Discard every request issued so far on `lanes`.
    pub fn invalidate(&mut self, lanes: &[Lane]) {
        for &lane in lanes {
            self.floor.insert(lane, self.last_issued);
        }
    }
}
