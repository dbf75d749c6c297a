//! Ballot registration
//!
//! Turns a (voter, election, candidate) triple into a durable one-time vote.
//! The write is one atomic store transaction inserting two rows: the
//! [`crate::types::VoteReceipt`] (participation proof, no candidate) and the
//! [`crate::types::BallotRecord`] (tally entry, no voter). The receipt's
//! uniqueness over (voter, election) is decided inside the store at write
//! time; the registrar never concludes "already voted" from a prior read,
//! so two concurrent submissions from the same voter yield exactly one
//! acceptance.

use crate::ballot::receipt::ReceiptCodeGenerator;
use crate::store::{BatchPolicy, TxOutcome, VoteStore};
use crate::types::{BallotRecord, CandidateId, ElectionId, VoteReceipt, VoterId};
use crate::{target_error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a single cast attempt
///
/// `AlreadyVoted` is a terminal outcome for that election, not an error:
/// the voter's earlier ballot stands and nothing was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CastOutcome {
    /// The vote is durably recorded; `receipt_code` is a one-time display
    /// code with no persisted linkage to the voter or the selection
    Accepted {
        receipt_code: String,
        cast_at: DateTime<Utc>,
    },

    /// A receipt for this (voter, election) already existed
    AlreadyVoted { election_id: ElectionId },
}

/// One accepted entry of a batch cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedBallot {
    pub election_id: ElectionId,
    pub receipt_code: String,
    pub cast_at: DateTime<Utc>,
}

/// Outcome of a batch cast across several elections
///
/// Under [`BatchPolicy::AllOrNothing`], any entry in `already_voted` means
/// the whole batch was rolled back and `accepted` is empty. Under
/// [`BatchPolicy::SkipDuplicates`], the two lists partition the batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub accepted: Vec<AcceptedBallot>,
    pub already_voted: Vec<ElectionId>,
}

/// Registers ballots against the shared store
///
/// The sole writer of receipts and tally entries. The batch duplicate
/// policy is fixed at construction and applied uniformly for the life of
/// the registrar.
pub struct BallotRegistrar {
    store: Arc<dyn VoteStore>,
    policy: BatchPolicy,
}

impl BallotRegistrar {
    /// Create a registrar with the default batch policy (skip duplicates)
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self {
            store,
            policy: BatchPolicy::default(),
        }
    }

    /// Create a registrar with an explicit batch policy
    pub fn with_policy(store: Arc<dyn VoteStore>, policy: BatchPolicy) -> Self {
        Self { store, policy }
    }

    /// Cast one ballot for one election
    ///
    /// Preconditions (checked before any write): the election exists, is
    /// active and has opened, and the candidate belongs to it. On success
    /// exactly one receipt and one tally entry exist, committed together.
    pub fn cast_ballot(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<CastOutcome> {
        let now = Utc::now();
        self.check_target(election_id, candidate_id, now)?;

        let receipt = VoteReceipt::new(voter_id, election_id, now);
        let record = BallotRecord::new(election_id, candidate_id, now);

        match self.store.record_vote(receipt, record)? {
            TxOutcome::Committed => {
                // Log participation only; the candidate never appears in the
                // same event as the voter.
                tracing::info!(voter = %voter_id, election = %election_id, "ballot accepted");
                Ok(CastOutcome::Accepted {
                    receipt_code: ReceiptCodeGenerator::new().generate(),
                    cast_at: now,
                })
            }
            TxOutcome::DuplicateReceipt => {
                tracing::info!(
                    voter = %voter_id,
                    election = %election_id,
                    "duplicate ballot rejected"
                );
                Ok(CastOutcome::AlreadyVoted { election_id })
            }
        }
    }

    /// Cast ballots for several elections in one enclosing transaction
    ///
    /// All selections are validated before any write; a precondition
    /// failure rejects the whole batch. Duplicates are then handled by the
    /// registrar's fixed [`BatchPolicy`].
    pub fn cast_all(
        &self,
        voter_id: VoterId,
        selections: &[(ElectionId, CandidateId)],
    ) -> Result<BatchOutcome> {
        let now = Utc::now();
        for (election_id, candidate_id) in selections {
            self.check_target(*election_id, *candidate_id, now)?;
        }

        let entries = selections
            .iter()
            .map(|(election_id, candidate_id)| {
                (
                    VoteReceipt::new(voter_id, *election_id, now),
                    BallotRecord::new(*election_id, *candidate_id, now),
                )
            })
            .collect();

        let tx = self.store.record_votes(entries, self.policy)?;

        let mut generator = ReceiptCodeGenerator::new();
        let outcome = BatchOutcome {
            accepted: tx
                .committed
                .iter()
                .map(|election_id| AcceptedBallot {
                    election_id: *election_id,
                    receipt_code: generator.generate(),
                    cast_at: now,
                })
                .collect(),
            already_voted: tx.duplicates,
        };

        tracing::info!(
            voter = %voter_id,
            accepted = outcome.accepted.len(),
            duplicates = outcome.already_voted.len(),
            "batch ballot processed"
        );
        Ok(outcome)
    }

    /// Validate that the election is open and the candidate belongs to it
    fn check_target(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let election = self
            .store
            .election(election_id)?
            .ok_or_else(|| target_error!("election {} not found", election_id))?;

        if !election.is_open_at(now) {
            return Err(target_error!(
                "election {} is not open for voting",
                election_id
            ));
        }

        let candidates = self.store.candidates_of(election_id)?;
        if !candidates.iter().any(|c| c.id == candidate_id) {
            return Err(target_error!(
                "candidate {} does not belong to election {}",
                candidate_id,
                election_id
            ));
        }
        Ok(())
    }
}
