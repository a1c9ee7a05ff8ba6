use std::fmt::{Display, Formatter};

use k256::{
    elliptic_curve::sec1::FromEncodedPoint,
    AffinePoint, EncodedPoint,
};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

use super::pedersen::PedersenCommitment;

// SEC-1 compressed point size in bytes
pub const COMMITMENT_SIZE: usize = 33;

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum DecompressionError {
    #[error("commitment must be {COMMITMENT_SIZE} bytes")]
    InvalidLength,
    #[error("point decompression failed")]
    InvalidPoint,
}

// A Pedersen commitment compressed to its 33-byte SEC-1 encoding
// The first byte is 0x02 or 0x03; the point at infinity has no compressed
// encoding and can never be referenced externally
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompressedCommitment([u8; COMMITMENT_SIZE]);

impl CompressedCommitment {
    // Callers going through from_slice get tag and length validation;
    // this constructor trusts its input
    pub const fn new(bytes: [u8; COMMITMENT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecompressionError> {
        let bytes: [u8; COMMITMENT_SIZE] = bytes
            .try_into()
            .map_err(|_| DecompressionError::InvalidLength)?;

        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(DecompressionError::InvalidPoint);
        }

        Ok(Self(bytes))
    }

    // Commitment as its 33 compressed bytes
    pub const fn as_bytes(&self) -> &[u8; COMMITMENT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    // Decompress to a PedersenCommitment, rejecting x coordinates that do
    // not lie on the curve
    pub fn decompress(&self) -> Result<PedersenCommitment, DecompressionError> {
        let encoded =
            EncodedPoint::from_bytes(self.0).map_err(|_| DecompressionError::InvalidPoint)?;
        let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(DecompressionError::InvalidPoint)?;

        Ok(PedersenCommitment::from_point(point.into()))
    }
}

impl Display for CompressedCommitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for CompressedCommitment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for CompressedCommitment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        let decoded = hex::decode(hex).map_err(SerdeError::custom)?;
        CompressedCommitment::from_slice(&decoded).map_err(SerdeError::custom)
    }
}

impl Serializer for CompressedCommitment {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let bytes = reader.read_bytes_ref(COMMITMENT_SIZE)?;
        CompressedCommitment::from_slice(bytes).map_err(|_| ReaderError::InvalidValue)
    }

    fn size(&self) -> usize {
        COMMITMENT_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::pedersen::{PedersenOpening, PC_GENS};

    fn sample_commitment() -> CompressedCommitment {
        let opening = PedersenOpening::generate_new();
        PedersenCommitment::new_with_opening(1000, &opening).compress()
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(
            CompressedCommitment::from_slice(&[0x02; 32]),
            Err(DecompressionError::InvalidLength)
        );
        assert_eq!(
            CompressedCommitment::from_slice(&[]),
            Err(DecompressionError::InvalidLength)
        );
    }

    #[test]
    fn test_wrong_tag_rejected() {
        // 0x04 announces an uncompressed point; only compressed form is
        // accepted on the wire
        let mut bytes = [0u8; COMMITMENT_SIZE];
        bytes[0] = 0x04;
        assert_eq!(
            CompressedCommitment::from_slice(&bytes),
            Err(DecompressionError::InvalidPoint)
        );
    }

    #[test]
    fn test_off_curve_point_rejected() {
        // x = 2^256 - 1 is not a valid field element
        let mut bytes = [0xFFu8; COMMITMENT_SIZE];
        bytes[0] = 0x02;
        let commitment = CompressedCommitment::from_slice(&bytes).unwrap();
        assert_eq!(
            commitment.decompress(),
            Err(DecompressionError::InvalidPoint)
        );
    }

    #[test]
    fn test_valid_point_round_trip() {
        let compressed = sample_commitment();
        let point = compressed.decompress().unwrap();
        assert_eq!(point.compress(), compressed);
    }

    #[test]
    fn test_generator_decompresses() {
        let g = PC_GENS.compressed_base();
        assert!(g.decompress().is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let commitment = sample_commitment();
        let json = serde_json::to_value(&commitment).unwrap();
        let restored: CompressedCommitment = serde_json::from_value(json).unwrap();
        assert_eq!(commitment, restored);
    }

    #[test]
    fn test_serializer_round_trip() {
        let commitment = sample_commitment();
        let bytes = commitment.to_bytes();
        assert_eq!(bytes.len(), commitment.size());

        let restored = CompressedCommitment::from_bytes(&bytes).unwrap();
        assert_eq!(restored, commitment);
    }
}
