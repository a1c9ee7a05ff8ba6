use serde::{Deserialize, Serialize};

use crate::{
    crypto::{CompressedCommitment, PedersenCommitment, PedersenOpening, BLINDING_SIZE},
    entity::{AccountId, TokenId},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// The secrets behind a note commitment: the blinding scalar and the
/// hidden amount. Only the minter of a note holds these; notes adopted
/// from the wire carry none.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NoteOpening {
    #[serde(with = "hex::serde")]
    blinding: [u8; BLINDING_SIZE],
    amount: u64,
}

impl NoteOpening {
    pub fn new(blinding: [u8; BLINDING_SIZE], amount: u64) -> Self {
        NoteOpening { blinding, amount }
    }

    #[inline]
    pub fn get_blinding(&self) -> &[u8; BLINDING_SIZE] {
        &self.blinding
    }

    #[inline]
    pub fn get_amount(&self) -> u64 {
        self.amount
    }
}

impl Serializer for NoteOpening {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.blinding);
        writer.write_u64(self.amount);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let blinding = reader.read_bytes_32()?;
        let amount = reader.read_u64()?;
        Ok(NoteOpening { blinding, amount })
    }

    fn size(&self) -> usize {
        BLINDING_SIZE + 8
    }
}

/// An outstanding confidential note: a commitment to a hidden amount,
/// owned by an account under a specific token.
///
/// Two variants by construction:
/// - `known`: produced locally when minting; the opening is retained.
/// - `external`: adopted from a validated incoming transfer; the sender
///   alone knows the opening.
///
/// Notes are immutable; a transfer destroys its inputs and creates fresh
/// outputs rather than mutating anything in place.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrivateNote {
    token: TokenId,
    owner: AccountId,
    commitment: CompressedCommitment,
    opening: Option<NoteOpening>,
}

impl PrivateNote {
    /// Note with a locally known opening
    pub fn known(
        token: TokenId,
        owner: AccountId,
        commitment: CompressedCommitment,
        blinding: [u8; BLINDING_SIZE],
        amount: u64,
    ) -> Self {
        PrivateNote {
            token,
            owner,
            commitment,
            opening: Some(NoteOpening::new(blinding, amount)),
        }
    }

    /// Note adopted from an incoming transfer; no opening available
    pub fn external(token: TokenId, owner: AccountId, commitment: CompressedCommitment) -> Self {
        PrivateNote {
            token,
            owner,
            commitment,
            opening: None,
        }
    }

    /// Mint a fresh treasury note: sample an opening, commit to `amount`
    /// and keep the secrets
    pub fn new_treasury(token: TokenId, owner: AccountId, amount: u64) -> Self {
        let opening = PedersenOpening::generate_new();
        let commitment = PedersenCommitment::new_with_opening(amount, &opening).compress();
        PrivateNote::known(token, owner, commitment, opening.to_bytes(), amount)
    }

    #[inline]
    pub fn get_token(&self) -> &TokenId {
        &self.token
    }

    #[inline]
    pub fn get_owner(&self) -> &AccountId {
        &self.owner
    }

    #[inline]
    pub fn get_commitment(&self) -> &CompressedCommitment {
        &self.commitment
    }

    #[inline]
    pub fn get_opening(&self) -> Option<&NoteOpening> {
        self.opening.as_ref()
    }

    /// Whether the hidden amount is known to this process
    #[inline]
    pub fn value_known(&self) -> bool {
        self.opening.is_some()
    }

    /// The hidden amount, when known
    #[inline]
    pub fn value(&self) -> Option<u64> {
        self.opening.as_ref().map(NoteOpening::get_amount)
    }
}

impl Serializer for PrivateNote {
    fn write(&self, writer: &mut Writer) {
        self.token.write(writer);
        self.owner.write(writer);
        self.commitment.write(writer);
        self.opening.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let token = TokenId::read(reader)?;
        let owner = AccountId::read(reader)?;
        let commitment = CompressedCommitment::read(reader)?;
        let opening = Option::read(reader)?;

        Ok(PrivateNote {
            token,
            owner,
            commitment,
            opening,
        })
    }

    fn size(&self) -> usize {
        self.token.size() + self.owner.size() + self.commitment.size() + self.opening.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: TokenId = TokenId::new(0, 0, 9090);
    const TREASURY: AccountId = AccountId::new(0, 0, 2);

    #[test]
    fn test_treasury_note_is_known() {
        let note = PrivateNote::new_treasury(TOKEN, TREASURY, 5000);

        assert!(note.value_known());
        assert_eq!(note.value(), Some(5000));
        assert_eq!(note.get_owner(), &TREASURY);
        assert!(note.get_commitment().decompress().is_ok());
    }

    #[test]
    fn test_treasury_note_commitment_opens() {
        // The stored opening reproduces the stored commitment
        let note = PrivateNote::new_treasury(TOKEN, TREASURY, 77);
        let opening = note.get_opening().unwrap();

        let blinding = PedersenOpening::from_bytes(opening.get_blinding()).unwrap();
        let recomputed = PedersenCommitment::new_with_opening(opening.get_amount(), &blinding);
        assert_eq!(&recomputed.compress(), note.get_commitment());
    }

    #[test]
    fn test_external_note_has_no_value() {
        let commitment = PrivateNote::new_treasury(TOKEN, TREASURY, 1)
            .get_commitment()
            .clone();
        let note = PrivateNote::external(TOKEN, AccountId::new(0, 0, 1234), commitment);

        assert!(!note.value_known());
        assert_eq!(note.value(), None);
        assert_eq!(note.get_opening(), None);
    }

    #[test]
    fn test_serializer_round_trip() {
        let known = PrivateNote::new_treasury(TOKEN, TREASURY, 42);
        let restored = PrivateNote::from_bytes(&known.to_bytes()).unwrap();
        assert_eq!(known, restored);
        assert_eq!(known.to_bytes().len(), known.size());

        let external =
            PrivateNote::external(TOKEN, TREASURY, known.get_commitment().clone());
        let restored = PrivateNote::from_bytes(&external.to_bytes()).unwrap();
        assert_eq!(external, restored);
    }
}
