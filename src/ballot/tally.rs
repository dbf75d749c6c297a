//! Result aggregation and delayed disclosure
//!
//! Counts tally entries per candidate and decides, per election, whether the
//! counts may be shown yet. Two independent gates guard disclosure: the
//! quorum gate (a configured minimum ballot count) and the delay gate (a
//! configured wait after the first ballot). Until both pass, callers get a
//! [`ElectionResults::Withheld`] naming the failed gate and never any
//! partial counts — a running count during the delay window would defeat
//! the delay.

use crate::config::DisclosureConfig;
use crate::store::VoteStore;
use crate::types::{CandidateId, CandidateKind, ElectionId};
use crate::{target_error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;

/// Disclosed count for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub candidate_id: CandidateId,
    pub name: String,
    pub kind: CandidateKind,
    pub count: u64,
    /// count / total × 100; 0 when the election has no ballots
    pub percent: f64,
}

/// Why disclosure is currently withheld
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithheldReason {
    /// Fewer ballots than the configured quorum
    QuorumNotMet { received: u64, required: u64 },

    /// The configured delay since the first ballot has not elapsed
    DelayActive { remaining_seconds: i64 },
}

/// Result of a disclosure request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElectionResults {
    /// Both gates passed; `tallies` is ordered for presentation
    Disclosed {
        total: u64,
        tallies: Vec<CandidateTally>,
    },

    /// A gate failed; no count data accompanies this variant
    Withheld { reason: WithheldReason },
}

/// Computes per-candidate counts behind the disclosure gates
pub struct ResultAggregator {
    store: Arc<dyn VoteStore>,
    config: DisclosureConfig,
}

impl ResultAggregator {
    pub fn new(store: Arc<dyn VoteStore>, config: DisclosureConfig) -> Self {
        Self { store, config }
    }

    /// Results for an election, evaluated at the current instant
    pub fn get_results(&self, election_id: ElectionId) -> Result<ElectionResults> {
        self.results_at(election_id, Utc::now())
    }

    /// Results for an election, evaluated at an explicit instant
    ///
    /// The instant only drives the delay gate; counts always reflect the
    /// store at query time.
    pub fn results_at(
        &self,
        election_id: ElectionId,
        now: DateTime<Utc>,
    ) -> Result<ElectionResults> {
        self.store
            .election(election_id)?
            .ok_or_else(|| target_error!("election {} not found", election_id))?;

        let total = self.store.ballot_count(election_id)?;

        // Quorum gate.
        if total < self.config.min_votes {
            tracing::debug!(
                election = %election_id,
                received = total,
                required = self.config.min_votes,
                "results withheld: quorum not met"
            );
            return Ok(ElectionResults::Withheld {
                reason: WithheldReason::QuorumNotMet {
                    received: total,
                    required: self.config.min_votes,
                },
            });
        }

        // Delay gate, counted from the first ballot. With no ballots there
        // is nothing the delay could protect, so the gate is vacuously
        // satisfied.
        if let Some(first) = self.store.first_ballot_at(election_id)? {
            let disclose_from = first + self.config.result_delay();
            if now < disclose_from {
                let remaining_seconds = (disclose_from - now).num_seconds();
                tracing::debug!(
                    election = %election_id,
                    remaining_seconds,
                    "results withheld: delay active"
                );
                return Ok(ElectionResults::Withheld {
                    reason: WithheldReason::DelayActive { remaining_seconds },
                });
            }
        }

        let counts = self.store.tally(election_id)?;
        let mut tallies: Vec<CandidateTally> = self
            .store
            .candidates_of(election_id)?
            .into_iter()
            .map(|candidate| {
                let count = counts.get(&candidate.id).copied().unwrap_or(0);
                let percent = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                };
                CandidateTally {
                    candidate_id: candidate.id,
                    name: candidate.name,
                    kind: candidate.kind,
                    count,
                    percent,
                }
            })
            .collect();

        // Substantive candidates by descending count (name breaks ties);
        // blank and void rank after them regardless of their counts.
        tallies.sort_by(|a, b| {
            (a.kind.disclosure_rank(), Reverse(a.count), a.name.clone()).cmp(&(
                b.kind.disclosure_rank(),
                Reverse(b.count),
                b.name.clone(),
            ))
        });

        tracing::info!(election = %election_id, total, "results disclosed");
        Ok(ElectionResults::Disclosed { total, tallies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{BallotRecord, Candidate, Election, VoteReceipt, VoterId};

    struct Fixture {
        store: Arc<MemoryStore>,
        election: Election,
        alice: Candidate,
        bob: Candidate,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let election = store
            .insert_election(Election::new("Diretoria", true, Utc::now()))
            .unwrap();
        let alice = store
            .insert_candidate(Candidate::new(election.id, "Alice"))
            .unwrap();
        let bob = store
            .insert_candidate(Candidate::new(election.id, "Bob"))
            .unwrap();
        Fixture {
            store,
            election,
            alice,
            bob,
        }
    }

    fn cast_at(fixture: &Fixture, candidate: &Candidate, at: DateTime<Utc>) {
        fixture
            .store
            .record_vote(
                VoteReceipt::new(VoterId::new(), fixture.election.id, at),
                BallotRecord::new(fixture.election.id, candidate.id, at),
            )
            .unwrap();
    }

    #[test]
    fn test_quorum_gate_withholds_below_minimum() {
        let f = fixture();
        let aggregator =
            ResultAggregator::new(f.store.clone(), DisclosureConfig::new(2, 0).unwrap());

        cast_at(&f, &f.alice, Utc::now());
        let results = aggregator.get_results(f.election.id).unwrap();
        assert_eq!(
            results,
            ElectionResults::Withheld {
                reason: WithheldReason::QuorumNotMet {
                    received: 1,
                    required: 2
                }
            }
        );
    }

    #[test]
    fn test_delay_gate_withholds_until_elapsed() {
        let f = fixture();
        let aggregator =
            ResultAggregator::new(f.store.clone(), DisclosureConfig::new(0, 30).unwrap());

        let first_vote = Utc::now();
        cast_at(&f, &f.alice, first_vote);

        // Ten minutes in: still twenty to wait.
        let during = f
            .store
            .first_ballot_at(f.election.id)
            .unwrap()
            .unwrap()
            + chrono::Duration::minutes(10);
        match aggregator.results_at(f.election.id, during).unwrap() {
            ElectionResults::Withheld {
                reason: WithheldReason::DelayActive { remaining_seconds },
            } => assert_eq!(remaining_seconds, 20 * 60),
            other => panic!("expected delay withhold, got {other:?}"),
        }

        // Exactly at the boundary the gate opens.
        let at_boundary = first_vote + chrono::Duration::minutes(30);
        assert!(matches!(
            aggregator.results_at(f.election.id, at_boundary).unwrap(),
            ElectionResults::Disclosed { .. }
        ));
    }

    #[test]
    fn test_empty_election_discloses_zero_counts_with_zero_quorum() {
        let f = fixture();
        let aggregator =
            ResultAggregator::new(f.store.clone(), DisclosureConfig::new(0, 30).unwrap());

        // No ballots: quorum 0 passes, delay has no first vote to anchor on.
        match aggregator.get_results(f.election.id).unwrap() {
            ElectionResults::Disclosed { total, tallies } => {
                assert_eq!(total, 0);
                assert!(tallies.iter().all(|t| t.count == 0 && t.percent == 0.0));
            }
            other => panic!("expected disclosure, got {other:?}"),
        }
    }

    #[test]
    fn test_disclosed_counts_and_percentages() {
        let f = fixture();
        let aggregator = ResultAggregator::new(f.store.clone(), DisclosureConfig::for_testing());

        let past = Utc::now() - chrono::Duration::hours(1);
        cast_at(&f, &f.alice, past);
        cast_at(&f, &f.alice, past);
        cast_at(&f, &f.bob, past);

        match aggregator.get_results(f.election.id).unwrap() {
            ElectionResults::Disclosed { total, tallies } => {
                assert_eq!(total, 3);
                assert_eq!(tallies[0].name, "Alice");
                assert_eq!(tallies[0].count, 2);
                assert!((tallies[0].percent - 66.666).abs() < 0.01);
                assert_eq!(tallies[1].name, "Bob");
                assert_eq!(tallies[1].count, 1);
            }
            other => panic!("expected disclosure, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_and_void_rank_after_substantive_candidates() {
        let f = fixture();
        let blank = f
            .store
            .insert_candidate(Candidate::new(f.election.id, "BRANCO"))
            .unwrap();
        let void = f
            .store
            .insert_candidate(Candidate::new(f.election.id, "NULO"))
            .unwrap();
        let aggregator = ResultAggregator::new(f.store.clone(), DisclosureConfig::for_testing());

        let past = Utc::now() - chrono::Duration::hours(1);
        // Blank outpolls everyone, void outpolls Bob; neither may outrank a
        // substantive candidate in the presentation order.
        cast_at(&f, &blank, past);
        cast_at(&f, &blank, past);
        cast_at(&f, &blank, past);
        cast_at(&f, &void, past);
        cast_at(&f, &void, past);
        cast_at(&f, &f.alice, past);

        match aggregator.get_results(f.election.id).unwrap() {
            ElectionResults::Disclosed { tallies, .. } => {
                let names: Vec<&str> = tallies.iter().map(|t| t.name.as_str()).collect();
                assert_eq!(names, vec!["Alice", "Bob", "BRANCO", "NULO"]);
            }
            other => panic!("expected disclosure, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_election_is_an_error() {
        let f = fixture();
        let aggregator = ResultAggregator::new(f.store.clone(), DisclosureConfig::for_testing());
        let result = aggregator.get_results(ElectionId::new());
        assert!(matches!(result, Err(crate::Error::UnknownTarget { .. })));
    }
}
