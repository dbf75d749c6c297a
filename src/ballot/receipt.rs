//! Display receipt codes
//!
//! An accepted ballot hands the voter a short proof-of-participation code.
//! The code is a digest of fresh random bytes: it is shown once, never
//! persisted, never required again, and carries no information about the
//! voter or the selection. It exists purely so the portal has something to
//! display on the confirmation screen.

use rand::RngCore;

/// Generator for one-time display receipt codes
pub struct ReceiptCodeGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ReceiptCodeGenerator {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a fresh receipt code (hex digest of 32 random bytes)
    pub fn generate(&mut self) -> String {
        let mut nonce = [0u8; 32];
        self.rng.fill_bytes(&mut nonce);
        hex::encode(blake3::hash(&nonce).as_bytes())
    }
}

impl Default for ReceiptCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
