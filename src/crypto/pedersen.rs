use k256::{
    elliptic_curve::{ops::Reduce, sec1::ToEncodedPoint, PrimeField},
    ProjectivePoint, Scalar, U256,
};
use lazy_static::lazy_static;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::{
    commitment::{CompressedCommitment, DecompressionError, COMMITMENT_SIZE},
    random::secure_random_bytes,
};

// Blinding scalar size in bytes (big-endian)
pub const BLINDING_SIZE: usize = 32;

lazy_static! {
    // Process-wide Pedersen generators, derived once at startup
    pub static ref PC_GENS: PedersenGens = PedersenGens::derive();
}

/// The two generators of the commitment scheme: the standard secp256k1
/// base point G and an auxiliary generator H.
///
/// H is derived deterministically as `H = s * G` with
/// `s = SHA-256(SEC1(G)) mod n` (and `s = 1` should the reduction ever be
/// zero). The discrete log of H with respect to G is therefore publicly
/// known, which is acceptable for this prototype but NOT binding-safe: a
/// deployment must replace this with a hash-to-curve derivation before
/// commitments carry real value.
pub struct PedersenGens {
    base: ProjectivePoint,
    aux: ProjectivePoint,
}

impl PedersenGens {
    pub fn derive() -> Self {
        let base = ProjectivePoint::GENERATOR;
        let encoded = base.to_affine().to_encoded_point(true);
        let digest: [u8; 32] = Sha256::digest(encoded.as_bytes()).into();

        let mut scalar = <Scalar as Reduce<U256>>::reduce_bytes(&digest.into());
        if scalar == Scalar::ZERO {
            scalar = Scalar::ONE;
        }

        PedersenGens {
            base,
            aux: base * scalar,
        }
    }

    // Generator binding the committed amount
    #[inline]
    pub fn base(&self) -> &ProjectivePoint {
        &self.base
    }

    // Generator binding the blinding factor
    #[inline]
    pub fn aux(&self) -> &ProjectivePoint {
        &self.aux
    }

    pub fn compressed_base(&self) -> CompressedCommitment {
        compress_point(&self.base)
    }
}

/// A non-zero blinding scalar in `[1, n-1]`, zeroized on drop.
#[derive(Clone)]
pub struct PedersenOpening(Scalar);

impl PedersenOpening {
    /// Sample a fresh opening from the OS CSPRNG.
    ///
    /// Rejection sampling: draw 32 bytes, reduce mod n, retry on zero.
    pub fn generate_new() -> Self {
        loop {
            let bytes = secure_random_bytes::<BLINDING_SIZE>();
            let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&bytes.into());
            if scalar != Scalar::ZERO {
                return PedersenOpening(scalar);
            }
        }
    }

    /// Decode a canonical 32-byte big-endian opening.
    /// Zero and values >= n are rejected.
    pub fn from_bytes(bytes: &[u8; BLINDING_SIZE]) -> Option<Self> {
        let scalar = Option::<Scalar>::from(Scalar::from_repr((*bytes).into()))?;
        if scalar == Scalar::ZERO {
            return None;
        }

        Some(PedersenOpening(scalar))
    }

    pub fn to_bytes(&self) -> [u8; BLINDING_SIZE] {
        self.0.to_bytes().into()
    }

    #[inline]
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    /// Opening that balances a transfer: `Σ inputs - Σ outputs`.
    ///
    /// A sender uses this for the final output so the blinding factors of
    /// both sides sum to the same value. The result can be zero when the
    /// given openings already balance; callers mint with non-zero openings
    /// so this does not occur in practice.
    pub fn balancing(inputs: &[PedersenOpening], outputs: &[PedersenOpening]) -> Self {
        let sum_side = |side: &[PedersenOpening]| {
            side.iter()
                .fold(Scalar::ZERO, |acc, opening| acc + opening.0)
        };

        PedersenOpening(sum_side(inputs) - sum_side(outputs))
    }
}

impl Zeroize for PedersenOpening {
    fn zeroize(&mut self) {
        self.0 = Scalar::ZERO;
    }
}

impl Drop for PedersenOpening {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// A Pedersen commitment `C = v * G + r * H` as a curve point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PedersenCommitment(ProjectivePoint);

impl PedersenCommitment {
    /// Commit to `amount` under the given opening.
    pub fn new_with_opening(amount: u64, opening: &PedersenOpening) -> Self {
        let gens = &*PC_GENS;
        PedersenCommitment(*gens.base() * Scalar::from(amount) + *gens.aux() * *opening.as_scalar())
    }

    pub const fn from_point(point: ProjectivePoint) -> Self {
        PedersenCommitment(point)
    }

    #[inline]
    pub fn as_point(&self) -> &ProjectivePoint {
        &self.0
    }

    // A commitment with a non-zero opening is never the identity, so the
    // compressed form always exists
    pub fn compress(&self) -> CompressedCommitment {
        compress_point(&self.0)
    }
}

fn compress_point(point: &ProjectivePoint) -> CompressedCommitment {
    let encoded = point.to_affine().to_encoded_point(true);
    let mut bytes = [0u8; COMMITMENT_SIZE];
    bytes.copy_from_slice(encoded.as_bytes());
    CompressedCommitment::new(bytes)
}

fn sum_side(side: &[CompressedCommitment]) -> Result<ProjectivePoint, DecompressionError> {
    let mut acc = ProjectivePoint::IDENTITY;
    for commitment in side {
        acc += *commitment.decompress()?.as_point();
    }

    Ok(acc)
}

/// Verify conservation of the hidden total: `Σ inputs == Σ outputs` as
/// curve points. An empty side sums to the point at infinity, so two empty
/// sides match.
///
/// Fails when any commitment does not decode to a curve point. No
/// randomness is consumed here; verification is fully deterministic.
pub fn sums_match(
    inputs: &[CompressedCommitment],
    outputs: &[CompressedCommitment],
) -> Result<bool, DecompressionError> {
    Ok(sum_side(inputs)? == sum_side(outputs)?)
}
