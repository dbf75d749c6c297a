//! Voting services: identity resolution, ballot registration, tallying
//!
//! The three services here are the crate's entire public surface:
//!
//! 1. [`VoterDirectory::resolve_voter`] turns a claimed (name, registration
//!    number) pair into a stable voter id.
//! 2. [`BallotRegistrar::cast_ballot`] turns a (voter, election, candidate)
//!    triple into a durable, one-time vote, atomically.
//! 3. [`ResultAggregator::get_results`] discloses per-candidate counts once
//!    the quorum and delay gates both pass.

pub mod identity;
pub mod receipt;
pub mod registrar;
pub mod tally;

pub use identity::VoterDirectory;
pub use receipt::ReceiptCodeGenerator;
pub use registrar::{AcceptedBallot, BallotRegistrar, BatchOutcome, CastOutcome};
pub use tally::{CandidateTally, ElectionResults, ResultAggregator, WithheldReason};
