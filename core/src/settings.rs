use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest of the initial shared secret. Replaced the first time the
/// operator changes the password.
pub const DEFAULT_OPERATOR_PASSWORD_HASH: &str =
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

/// Operator-facing settings. The credential digest is the only field the
/// application reads; anything else found in a stored or imported payload
/// is kept as-is so a backup round-trip does not shed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSettings {
    #[serde(rename = "operatorPasswordHash", default = "default_password_hash")]
    pub password_hash: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            password_hash: default_password_hash(),
            extra: serde_json::Map::new(),
        }
    }
}

impl OperatorSettings {
    /// Compares a plaintext candidate against the stored digest. The
    /// plaintext is hashed immediately and never kept.
    pub fn verify_password(&self, candidate: &str) -> bool {
        sha256_hex(candidate.as_bytes()).eq_ignore_ascii_case(&self.password_hash)
    }

    pub fn set_password(&mut self, plaintext: &str) {
        self.password_hash = sha256_hex(plaintext.as_bytes());
    }
}

fn default_password_hash() -> String {
    DEFAULT_OPERATOR_PASSWORD_HASH.to_string()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = std::fmt::Write::write_fmt(&mut hex, format_args!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_secret_verifies() {
        let settings = OperatorSettings::default();
        assert!(settings.verify_password("admin123"));
        assert!(!settings.verify_password("admin1234"));
    }

    #[test]
    fn changed_password_replaces_digest() {
        let mut settings = OperatorSettings::default();
        settings.set_password("correct horse");
        assert!(settings.verify_password("correct horse"));
        assert!(!settings.verify_password("admin123"));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = r#"{"operatorPasswordHash":"abc","kioskLabel":"east wing"}"#;
        let settings: OperatorSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.extra["kioskLabel"], "east wing");
        let encoded = serde_json::to_string(&settings).unwrap();
        let reparsed: OperatorSettings = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed, settings);
    }

    #[test]
    fn missing_hash_falls_back_to_default() {
        let settings: OperatorSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.password_hash, DEFAULT_OPERATOR_PASSWORD_HASH);
    }
}
