//! Storage seam for the voting core
//!
//! The relational store is an external collaborator; [`VoteStore`] captures
//! the exact contract the services need from it: parameterized lookups, a
//! uniqueness guarantee on voter registration numbers and on
//! `(voter, election)` receipts, and an atomic two-table write for each
//! accepted ballot.
//!
//! The bundled [`MemoryStore`] provides those guarantees in-process; a
//! SQL-backed implementation provides them with a unique index and a
//! transaction. Either way, the "already voted" decision is made INSIDE the
//! store at write time — never by the caller from an earlier read, which
//! would race under concurrent submissions.

pub mod memory;

pub use memory::MemoryStore;

use crate::types::{
    BallotRecord, Candidate, CandidateId, Election, ElectionId, VoteReceipt, Voter,
};
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Outcome of the atomic receipt-plus-record write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    /// Both the receipt and the tally entry are durably committed
    Committed,

    /// A receipt for this (voter, election) already existed; nothing was
    /// written
    DuplicateReceipt,
}

/// Duplicate policy for multi-election batch writes
///
/// Fixed up front and applied uniformly to the whole batch; the two modes are
/// never mixed within one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Any duplicate receipt aborts the entire batch; nothing commits
    AllOrNothing,

    /// Duplicate elections are skipped; all remaining entries commit together
    #[default]
    SkipDuplicates,
}

/// Outcome of a batch write, by election
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchTxOutcome {
    /// Elections whose receipt and tally entry were committed
    pub committed: Vec<ElectionId>,
    /// Elections rejected because a receipt already existed
    pub duplicates: Vec<ElectionId>,
}

impl BatchTxOutcome {
    /// True if every entry in the batch was committed
    pub fn fully_committed(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Contract the voting services require from the relational store
pub trait VoteStore: Send + Sync {
    /// Look up a voter by registration number (the identity key)
    fn find_voter_by_registration(&self, registration_number: &str) -> Result<Option<Voter>>;

    /// Insert a voter, honoring the uniqueness of the registration number
    ///
    /// If a voter with the same registration number already exists, the
    /// existing row is returned and nothing is written — the in-store
    /// analogue of `INSERT .. ON CONFLICT DO NOTHING` followed by a
    /// re-select, so concurrent first-time registrations can never create
    /// two rows.
    fn insert_voter(&self, voter: Voter) -> Result<Voter>;

    /// Fetch one election by id
    fn election(&self, id: ElectionId) -> Result<Option<Election>>;

    /// All elections currently flagged active
    fn active_elections(&self) -> Result<Vec<Election>>;

    /// Candidates belonging to one election
    fn candidates_of(&self, election_id: ElectionId) -> Result<Vec<Candidate>>;

    /// Atomically insert a receipt and its tally entry
    ///
    /// The receipt insert is the single source of truth for "already voted":
    /// if a receipt for `(receipt.voter_id, receipt.election_id)` exists,
    /// nothing is written and [`TxOutcome::DuplicateReceipt`] is returned.
    /// Otherwise both rows commit together. A partial write is never left
    /// visible.
    fn record_vote(&self, receipt: VoteReceipt, record: BallotRecord) -> Result<TxOutcome>;

    /// Atomically apply `record_vote` for several elections in one
    /// transaction, under the given duplicate policy
    fn record_votes(
        &self,
        entries: Vec<(VoteReceipt, BallotRecord)>,
        policy: BatchPolicy,
    ) -> Result<BatchTxOutcome>;

    /// Total tally entries for an election
    fn ballot_count(&self, election_id: ElectionId) -> Result<u64>;

    /// Timestamp of the earliest tally entry for an election, if any
    fn first_ballot_at(&self, election_id: ElectionId) -> Result<Option<DateTime<Utc>>>;

    /// Tally entries grouped and counted per candidate
    fn tally(&self, election_id: ElectionId) -> Result<HashMap<CandidateId, u64>>;
}
