/// Cryptographically secure random number generation
///
/// All blinding material MUST be drawn from the operating system CSPRNG
/// (OsRng); thread-local generators are not acceptable for commitment
/// openings.
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate cryptographically secure random bytes
pub fn secure_random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_random_bytes() {
        let bytes1 = secure_random_bytes::<32>();
        let bytes2 = secure_random_bytes::<32>();

        // Random bytes should be different each time
        assert_ne!(bytes1, bytes2);
        assert_eq!(bytes1.len(), 32);
    }
}
