//! # Core types for the ballot registration core
//!
//! Data structures shared by the identity resolver, the ballot registrar and
//! the result aggregator.
//!
//! ## Secrecy design
//!
//! Ballot secrecy in this crate is a property of the schema, not of any
//! hashing scheme:
//!
//! - [`BallotRecord`] (the tally entry) carries the election, the candidate
//!   and a timestamp — and deliberately NO voter field.
//! - [`VoteReceipt`] (the participation proof) carries the voter and the
//!   election — and deliberately NO candidate field.
//!
//! No persisted field joins a record back to a voter or a receipt forward to
//! a candidate selection. Keeping these two types free of each other's keys
//! is the entire anonymity mechanism.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a registered voter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub Uuid);

impl VoterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VoterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an election
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(pub Uuid);

impl ElectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub Uuid);

impl CandidateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered voter
///
/// Created on the first successful identification with a previously unseen
/// registration number. Immutable after creation; the registration number is
/// the identity key, the display name is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    /// Display name as entered at first registration (never used for lookup)
    pub name: String,
    /// Professional registration number; unique across voters
    pub registration_number: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Voter {
    pub fn new(name: impl Into<String>, registration_number: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: VoterId::new(),
            name: name.into(),
            registration_number: registration_number.into(),
            email,
            created_at: Utc::now(),
        }
    }
}

/// A ballot topic
///
/// Owned by an external administrative process; read-only from this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub title: String,
    pub active: bool,
    pub opens_at: DateTime<Utc>,
}

impl Election {
    pub fn new(title: impl Into<String>, active: bool, opens_at: DateTime<Utc>) -> Self {
        Self {
            id: ElectionId::new(),
            title: title.into(),
            active,
            opens_at,
        }
    }

    /// Whether ballots may be cast for this election at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.opens_at <= now
    }
}

/// Classification of a candidate option
///
/// Blank ("BRANCO") and void ("NULO") are reserved non-substantive options;
/// they tally like any other candidate but rank after all substantive
/// candidates when results are disclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    Substantive,
    Blank,
    Void,
}

impl CandidateKind {
    /// Classify a candidate by its reserved display name
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "BRANCO" => Self::Blank,
            "NULO" => Self::Void,
            _ => Self::Substantive,
        }
    }

    /// Disclosure ordering rank: substantive first, then blank, then void
    pub fn disclosure_rank(&self) -> u8 {
        match self {
            Self::Substantive => 1,
            Self::Blank => 2,
            Self::Void => 3,
        }
    }
}

/// An option within one election
///
/// Belongs to exactly one election; the candidate set is fixed while voting
/// is open. Read-only from this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub election_id: ElectionId,
    pub name: String,
    pub kind: CandidateKind,
}

impl Candidate {
    /// Create a candidate, classifying reserved names automatically
    pub fn new(election_id: ElectionId, name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = CandidateKind::from_name(&name);
        Self {
            id: CandidateId::new(),
            election_id,
            name,
            kind,
        }
    }
}

/// One anonymized cast vote (the tally entry)
///
/// Carries no voter-identifying field; see the module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotRecord {
    pub id: Uuid,
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    pub cast_at: DateTime<Utc>,
}

impl BallotRecord {
    pub fn new(election_id: ElectionId, candidate_id: CandidateId, cast_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            election_id,
            candidate_id,
            cast_at,
        }
    }
}

/// Proof that a voter has voted in an election (the participation record)
///
/// Used only to enforce one-vote-per-voter-per-election and to count
/// participation. Carries no candidate field; see the module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub voter_id: VoterId,
    pub election_id: ElectionId,
    pub cast_at: DateTime<Utc>,
}

impl VoteReceipt {
    pub fn new(voter_id: VoterId, election_id: ElectionId, cast_at: DateTime<Utc>) -> Self {
        Self {
            voter_id,
            election_id,
            cast_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_kind_reserved_names() {
        assert_eq!(CandidateKind::from_name("BRANCO"), CandidateKind::Blank);
        assert_eq!(CandidateKind::from_name("branco"), CandidateKind::Blank);
        assert_eq!(CandidateKind::from_name(" NULO "), CandidateKind::Void);
        assert_eq!(CandidateKind::from_name("Maria Silva"), CandidateKind::Substantive);
    }

    #[test]
    fn test_disclosure_rank_ordering() {
        assert!(CandidateKind::Substantive.disclosure_rank() < CandidateKind::Blank.disclosure_rank());
        assert!(CandidateKind::Blank.disclosure_rank() < CandidateKind::Void.disclosure_rank());
    }

    #[test]
    fn test_election_openness() {
        let now = Utc::now();
        let open = Election::new("Diretoria 2026", true, now - chrono::Duration::hours(1));
        assert!(open.is_open_at(now));

        let future = Election::new("Conselho 2027", true, now + chrono::Duration::hours(1));
        assert!(!future.is_open_at(now));

        let inactive = Election::new("Encerrada", false, now - chrono::Duration::hours(1));
        assert!(!inactive.is_open_at(now));
    }

    #[test]
    fn test_ballot_record_has_no_voter_linkage() {
        // Schema-level anonymity: serializing a tally entry must never expose
        // a voter field, and serializing a receipt must never expose a
        // candidate field.
        let record = BallotRecord::new(ElectionId::new(), CandidateId::new(), Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("voter"));

        let receipt = VoteReceipt::new(VoterId::new(), ElectionId::new(), Utc::now());
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(!json.contains("candidate"));
    }
}
