//! Voter identity resolution
//!
//! Maps a claimed (display name, registration number) pair to a stable
//! voter record, creating one on first contact. The registration number is
//! the sole identity key; the display name is informational and is never
//! used for lookup nor updated afterwards, so a later attempt with a
//! different name cannot re-label an existing identity.

use crate::store::VoteStore;
use crate::types::Voter;
use crate::{Error, Result};
use std::sync::Arc;

/// Resolves claimed identities against the voter table
pub struct VoterDirectory {
    store: Arc<dyn VoteStore>,
}

impl VoterDirectory {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Resolve a voter by registration number, registering on first contact
    ///
    /// Returns the existing record unmodified when the registration number
    /// is already known. Otherwise inserts a new voter; the store's
    /// uniqueness guarantee on the registration number resolves concurrent
    /// first-time registrations to a single row.
    pub fn resolve_voter(
        &self,
        display_name: &str,
        registration_number: &str,
        email: Option<&str>,
    ) -> Result<Voter> {
        let registration = registration_number.trim();
        if registration.is_empty() {
            return Err(Error::validation("registration_number"));
        }

        if let Some(existing) = self.store.find_voter_by_registration(registration)? {
            tracing::debug!(
                voter = %existing.id,
                "returning voter recognized by registration number"
            );
            return Ok(existing);
        }

        // Insert may lose a race with a concurrent first login under the
        // same number; the store then hands back the row that won.
        let voter = self.store.insert_voter(Voter::new(
            display_name.trim(),
            registration,
            email.map(|e| e.trim().to_string()),
        ))?;

        tracing::info!(voter = %voter.id, "voter registered");
        Ok(voter)
    }
}
