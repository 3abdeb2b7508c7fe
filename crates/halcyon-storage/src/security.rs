//! Security and encryption primitives
//!
//! Implements AES-GCM and ChaCha20-Poly1305 encryption of stored blobs,
//! Argon2id key derivation from wallet secrets, and password strength checks.

use crate::{Error, Result};
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use argon2::{Argon2, ParamsBuilder, Version};
use chacha20poly1305::ChaCha20Poly1305;
use halcyon_params::MIN_PASSWORD_LENGTH;
use rand::RngCore;
use zeroize::Zeroizing;

/// Salt length used for key derivation
pub const SALT_LEN: usize = 16;

/// Current blob format version
const BLOB_VERSION: u8 = 1;

/// Encryption algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    /// AES-256-GCM
    AesGcm,
    /// ChaCha20-Poly1305
    ChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    fn as_byte(&self) -> u8 {
        match self {
            Self::AesGcm => 0,
            Self::ChaCha20Poly1305 => 1,
        }
    }

    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::AesGcm),
            1 => Ok(Self::ChaCha20Poly1305),
            other => Err(Error::Decryption(format!("Unknown algorithm {}", other))),
        }
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub m_cost: u32,
    /// Iterations
    pub t_cost: u32,
    /// Parallel lanes
    pub p_cost: u32,
}

impl KdfParams {
    /// Production parameters: 64 MiB, 3 iterations, 4 lanes
    pub const STRONG: Self = Self {
        m_cost: 65536,
        t_cost: 3,
        p_cost: 4,
    };

    /// Cheap parameters for tests and development tooling
    pub const LIGHT: Self = Self {
        m_cost: 1024,
        t_cost: 1,
        p_cost: 1,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::STRONG
    }
}

/// 256-bit symmetric key
#[derive(Clone)]
pub struct MasterKey {
    key: Zeroizing<[u8; 32]>,
    algorithm: EncryptionAlgorithm,
}

impl MasterKey {
    /// Generate new random master key
    pub fn generate(algorithm: EncryptionAlgorithm) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut key[..]);
        Self { key, algorithm }
    }

    /// Create from bytes
    pub fn from_bytes(bytes: &[u8], algorithm: EncryptionAlgorithm) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::Encryption("Invalid key length".to_string()));
        }
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(bytes);
        Ok(Self { key, algorithm })
    }

    /// Derive a key from a secret (mnemonic or password) and salt with Argon2id
    pub fn derive(secret: &str, salt: &[u8], params: &KdfParams) -> Result<Self> {
        let key = derive_key_bytes(secret, salt, params)?;
        Self::from_bytes(&key[..], EncryptionAlgorithm::ChaCha20Poly1305)
    }

    /// Get key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Encrypt data.
    ///
    /// Format: `[version(1)][algorithm(1)][nonce(12)][ciphertext]`
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = match self.algorithm {
            EncryptionAlgorithm::AesGcm => Aes256Gcm::new(self.key.as_ref().into())
                .encrypt(Nonce::from_slice(&nonce_bytes), plaintext),
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                ChaCha20Poly1305::new(self.key.as_ref().into()).encrypt(
                    chacha20poly1305::Nonce::from_slice(&nonce_bytes),
                    plaintext,
                )
            }
        }
        .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(1 + 1 + 12 + ciphertext.len());
        result.push(BLOB_VERSION);
        result.push(self.algorithm.as_byte());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt data produced by [`MasterKey::encrypt`]
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.len() < 14 {
            return Err(Error::Decryption("Invalid ciphertext length".to_string()));
        }

        let version = data[0];
        if version != BLOB_VERSION {
            return Err(Error::Decryption(format!(
                "Unsupported encryption version: {}",
                version
            )));
        }
        let algorithm = EncryptionAlgorithm::from_byte(data[1])?;
        if algorithm != self.algorithm {
            return Err(Error::Decryption(format!(
                "Algorithm mismatch: expected {:?}, got {:?}",
                self.algorithm, algorithm
            )));
        }

        let nonce = &data[2..14];
        let ciphertext = &data[14..];
        match algorithm {
            EncryptionAlgorithm::AesGcm => Aes256Gcm::new(self.key.as_ref().into())
                .decrypt(Nonce::from_slice(nonce), ciphertext),
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                ChaCha20Poly1305::new(self.key.as_ref().into())
                    .decrypt(chacha20poly1305::Nonce::from_slice(nonce), ciphertext)
            }
        }
        .map_err(|_| Error::Decryption("Authentication failed".to_string()))
    }
}

/// Derive raw key bytes from a secret using Argon2id.
pub fn derive_key_bytes(
    secret: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>> {
    if salt.len() < SALT_LEN {
        return Err(Error::Encryption("Salt too short".to_string()));
    }

    let argon_params = ParamsBuilder::new()
        .m_cost(params.m_cost)
        .t_cost(params.t_cost)
        .p_cost(params.p_cost)
        .output_len(32)
        .build()
        .map_err(|e| Error::Encryption(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(secret.as_bytes(), salt, &mut key[..])
        .map_err(|e| Error::Encryption(e.to_string()))?;
    Ok(key)
}

/// Generate secure random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Password strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// Below the minimum length
    Weak,
    /// Minimum length, little variety
    Fair,
    /// 12+ characters or good variety
    Good,
    /// 16+ characters with variety
    Strong,
}

impl PasswordStrength {
    /// Check if password meets minimum requirements
    pub fn is_acceptable(&self) -> bool {
        *self >= Self::Fair
    }
}

/// Evaluate password strength
pub fn evaluate_password(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    let variety_score = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ]
    .iter()
    .filter(|&&b| b)
    .count();

    if len < MIN_PASSWORD_LENGTH {
        PasswordStrength::Weak
    } else if len < 12 && variety_score < 3 {
        PasswordStrength::Fair
    } else if len < 16 || variety_score < 3 {
        PasswordStrength::Good
    } else {
        PasswordStrength::Strong
    }
}

/// Validate a wallet password before anything is written
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(Error::WeakPassword("Password cannot be empty".to_string()));
    }
    if !evaluate_password(password).is_acceptable() {
        return Err(Error::WeakPassword(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_generation() {
        let key = MasterKey::generate(EncryptionAlgorithm::AesGcm);
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_encryption_decryption_aes_gcm() {
        let key = MasterKey::generate(EncryptionAlgorithm::AesGcm);
        let plaintext = b"Hello, Halcyon!";

        let ciphertext = key.encrypt(plaintext).unwrap();
        assert_ne!(ciphertext.as_slice(), plaintext);
        assert_eq!(ciphertext[0], 1);
        assert_eq!(ciphertext[1], 0);

        let decrypted = key.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted.as_slice(), plaintext);
    }

    #[test]
    fn test_encryption_decryption_chacha20() {
        let key = MasterKey::generate(EncryptionAlgorithm::ChaCha20Poly1305);
        let plaintext = b"Secret message";

        let ciphertext = key.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext[1], 1);
        assert_eq!(key.decrypt(&ciphertext).unwrap().as_slice(), plaintext);
    }

    #[test]
    fn test_wrong_key_decryption() {
        let key1 = MasterKey::generate(EncryptionAlgorithm::ChaCha20Poly1305);
        let key2 = MasterKey::generate(EncryptionAlgorithm::ChaCha20Poly1305);

        let ciphertext = key1.encrypt(b"Secret").unwrap();
        assert!(matches!(key2.decrypt(&ciphertext), Err(Error::Decryption(_))));
    }

    #[test]
    fn test_tampered_blob_rejected() {
        let key = MasterKey::generate(EncryptionAlgorithm::ChaCha20Poly1305);
        let mut ciphertext = key.encrypt(b"Secret").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xff;
        assert!(key.decrypt(&ciphertext).is_err());

        let mut ciphertext = key.encrypt(b"Secret").unwrap();
        ciphertext[0] = 9;
        assert!(key.decrypt(&ciphertext).is_err());

        assert!(key.decrypt(&[1, 1, 0]).is_err());
    }

    #[test]
    fn test_key_derivation() {
        let salt = generate_salt();
        let key1 = MasterKey::derive("passphrase", &salt, &KdfParams::LIGHT).unwrap();
        let key2 = MasterKey::derive("passphrase", &salt, &KdfParams::LIGHT).unwrap();
        let key3 = MasterKey::derive("other", &salt, &KdfParams::LIGHT).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), key3.as_bytes());
    }

    #[test]
    fn test_short_salt_rejected() {
        assert!(derive_key_bytes("secret", &[0u8; 8], &KdfParams::LIGHT).is_err());
    }

    #[test]
    fn test_argon2id_parameters() {
        assert_eq!(KdfParams::default().m_cost, 65536);
        assert_eq!(KdfParams::default().t_cost, 3);
        assert_eq!(KdfParams::default().p_cost, 4);
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(evaluate_password("short"), PasswordStrength::Weak);
        assert_eq!(evaluate_password("password"), PasswordStrength::Fair);
        assert_eq!(evaluate_password("Password1!"), PasswordStrength::Good);
        assert_eq!(evaluate_password("MySecurePass123!@#"), PasswordStrength::Strong);

        assert!(validate_password("password").is_ok());
        assert!(matches!(validate_password("1234567"), Err(Error::WeakPassword(_))));
        assert!(matches!(validate_password("        "), Err(Error::WeakPassword(_))));
    }
}
