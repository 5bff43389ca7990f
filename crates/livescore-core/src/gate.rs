//! Shared-secret check for mutating calls.

use subtle::ConstantTimeEq;

/// Stateless gate guarding match mutations.
///
/// Holds the configured shared secret and answers yes/no for a presented
/// token. The comparison is constant-time, so the answer's timing does
/// not reveal how much of a guess matched. An empty secret authorizes
/// nothing.
pub struct AdminGate {
    secret: Vec<u8>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        AdminGate {
            secret: secret.into().into_bytes(),
        }
    }

    /// True when `presented` matches the configured secret.
    pub fn authorize(&self, presented: &str) -> bool {
        if self.secret.is_empty() {
            return false;
        }
        bool::from(self.secret.ct_eq(presented.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_exact_secret() {
        let gate = AdminGate::new("s3cret");
        assert!(gate.authorize("s3cret"));
    }

    #[test]
    fn test_rejects_wrong_tokens() {
        let gate = AdminGate::new("s3cret");
        assert!(!gate.authorize("secret"));
        assert!(!gate.authorize("s3cre"));
        assert!(!gate.authorize("s3cret "));
        assert!(!gate.authorize(""));
    }

    #[test]
    fn test_empty_secret_authorizes_nothing() {
        let gate = AdminGate::new("");
        assert!(!gate.authorize(""));
        assert!(!gate.authorize("anything"));
    }

    #[test]
    fn test_secret_compares_by_bytes() {
        let gate = AdminGate::new("café-π");
        assert!(gate.authorize("café-π"));
        assert!(!gate.authorize("cafe-π"));
    }
}
