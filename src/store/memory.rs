//! In-memory store implementation
//!
//! All tables live behind a single mutex, so the receipt insert and its
//! paired tally-entry insert form one critical section. That lock is the
//! in-process equivalent of the relational store's unique index over
//! `(voter_id, election_id)` plus its enclosing transaction: two concurrent
//! submissions from the same voter serialize here, and exactly one of them
//! observes the duplicate.

use super::{BatchPolicy, BatchTxOutcome, TxOutcome, VoteStore};
use crate::types::{
    BallotRecord, Candidate, CandidateId, Election, ElectionId, VoteReceipt, Voter, VoterId,
};
use crate::{persistence_error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    voters: HashMap<VoterId, Voter>,
    /// registration_number -> voter id (the UNIQUE index on voters)
    registration_index: HashMap<String, VoterId>,
    elections: HashMap<ElectionId, Election>,
    candidates: HashMap<CandidateId, Candidate>,
    ballot_records: Vec<BallotRecord>,
    /// (voter, election) -> receipt (the UNIQUE index on vote_receipts)
    vote_receipts: HashMap<(VoterId, ElectionId), VoteReceipt>,
}

/// In-memory [`VoteStore`] with relational uniqueness semantics
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| persistence_error!("store lock poisoned"))
    }

    /// Seed an election (administrative side; not part of [`VoteStore`])
    pub fn insert_election(&self, election: Election) -> Result<Election> {
        let mut tables = self.lock()?;
        tables.elections.insert(election.id, election.clone());
        Ok(election)
    }

    /// Seed a candidate (administrative side; not part of [`VoteStore`])
    ///
    /// The owning election must already exist.
    pub fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate> {
        let mut tables = self.lock()?;
        if !tables.elections.contains_key(&candidate.election_id) {
            return Err(persistence_error!(
                "candidate references missing election {}",
                candidate.election_id
            ));
        }
        tables.candidates.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    /// Receipt count for an election (participation, not candidate counts)
    pub fn receipt_count(&self, election_id: ElectionId) -> Result<u64> {
        let tables = self.lock()?;
        Ok(tables
            .vote_receipts
            .keys()
            .filter(|(_, e)| *e == election_id)
            .count() as u64)
    }
}

impl VoteStore for MemoryStore {
    fn find_voter_by_registration(&self, registration_number: &str) -> Result<Option<Voter>> {
        let tables = self.lock()?;
        Ok(tables
            .registration_index
            .get(registration_number)
            .and_then(|id| tables.voters.get(id))
            .cloned())
    }

    fn insert_voter(&self, voter: Voter) -> Result<Voter> {
        let mut tables = self.lock()?;

        // Unique index on registration_number: a conflicting insert yields
        // the row that won, never a second row.
        if let Some(existing_id) = tables.registration_index.get(&voter.registration_number) {
            let existing = tables
                .voters
                .get(existing_id)
                .cloned()
                .ok_or_else(|| persistence_error!("registration index points at missing voter"))?;
            return Ok(existing);
        }

        tables
            .registration_index
            .insert(voter.registration_number.clone(), voter.id);
        tables.voters.insert(voter.id, voter.clone());
        Ok(voter)
    }

    fn election(&self, id: ElectionId) -> Result<Option<Election>> {
        let tables = self.lock()?;
        Ok(tables.elections.get(&id).cloned())
    }

    fn active_elections(&self) -> Result<Vec<Election>> {
        let tables = self.lock()?;
        let mut elections: Vec<Election> = tables
            .elections
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect();
        elections.sort_by(|a, b| a.opens_at.cmp(&b.opens_at));
        Ok(elections)
    }

    fn candidates_of(&self, election_id: ElectionId) -> Result<Vec<Candidate>> {
        let tables = self.lock()?;
        let mut candidates: Vec<Candidate> = tables
            .candidates
            .values()
            .filter(|c| c.election_id == election_id)
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(candidates)
    }

    fn record_vote(&self, receipt: VoteReceipt, record: BallotRecord) -> Result<TxOutcome> {
        let mut tables = self.lock()?;

        let key = (receipt.voter_id, receipt.election_id);
        if tables.vote_receipts.contains_key(&key) {
            return Ok(TxOutcome::DuplicateReceipt);
        }

        // Both inserts happen under the same guard: the transaction.
        tables.vote_receipts.insert(key, receipt);
        tables.ballot_records.push(record);
        Ok(TxOutcome::Committed)
    }

    fn record_votes(
        &self,
        entries: Vec<(VoteReceipt, BallotRecord)>,
        policy: BatchPolicy,
    ) -> Result<BatchTxOutcome> {
        let mut tables = self.lock()?;

        // First pass: decide, against the live receipt table AND within the
        // batch itself, which entries are duplicates.
        let mut seen_in_batch: Vec<(VoterId, ElectionId)> = Vec::new();
        let mut outcome = BatchTxOutcome::default();
        for (receipt, _) in &entries {
            let key = (receipt.voter_id, receipt.election_id);
            if tables.vote_receipts.contains_key(&key) || seen_in_batch.contains(&key) {
                outcome.duplicates.push(receipt.election_id);
            } else {
                seen_in_batch.push(key);
            }
        }

        if policy == BatchPolicy::AllOrNothing && !outcome.duplicates.is_empty() {
            // Whole-batch abort: nothing committed.
            return Ok(outcome);
        }

        // Second pass: commit every non-duplicate entry, still under the
        // same guard. Re-checking the receipt table also skips repeated
        // elections within the batch after their first occurrence commits.
        for (receipt, record) in entries {
            let key = (receipt.voter_id, receipt.election_id);
            if tables.vote_receipts.contains_key(&key) {
                continue;
            }
            tables.vote_receipts.insert(key, receipt);
            outcome.committed.push(record.election_id);
            tables.ballot_records.push(record);
        }

        Ok(outcome)
    }

    fn ballot_count(&self, election_id: ElectionId) -> Result<u64> {
        let tables = self.lock()?;
        Ok(tables
            .ballot_records
            .iter()
            .filter(|r| r.election_id == election_id)
            .count() as u64)
    }

    fn first_ballot_at(&self, election_id: ElectionId) -> Result<Option<DateTime<Utc>>> {
        let tables = self.lock()?;
        Ok(tables
            .ballot_records
            .iter()
            .filter(|r| r.election_id == election_id)
            .map(|r| r.cast_at)
            .min())
    }

    fn tally(&self, election_id: ElectionId) -> Result<HashMap<CandidateId, u64>> {
        let tables = self.lock()?;
        let mut counts: HashMap<CandidateId, u64> = HashMap::new();
        for record in tables
            .ballot_records
            .iter()
            .filter(|r| r.election_id == election_id)
        {
            *counts.entry(record.candidate_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
