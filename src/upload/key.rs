//! Object key generation
//!
//! Keys are a short random identifier plus the original extension, so the
//! uploaded object never reveals the local file name.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of the random part of an object key
pub const KEY_LENGTH: usize = 5;

/// Generates random object keys like `ab12X.png`
#[derive(Debug, Clone, Copy)]
pub struct KeyGenerator {
    length: usize,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self { length: KEY_LENGTH }
    }
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh random identifier
    pub fn random_id(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }

    /// Random identifier followed by `.{extension}`; extension has no leading dot
    pub fn generate(&self, extension: &str) -> String {
        format!("{}.{}", self.random_id(), extension)
    }
}
