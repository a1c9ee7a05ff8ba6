use serde::{Deserialize, Serialize};

use crate::{
    entity::TokenId,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// TreasuryMintPayload issues a fresh note of the given amount to the
/// token treasury. The amount is visible here; only the resulting note
/// hides it behind a commitment.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreasuryMintPayload {
    token: TokenId,
    amount: u64,
}

impl TreasuryMintPayload {
    pub fn new(token: TokenId, amount: u64) -> Self {
        TreasuryMintPayload { token, amount }
    }

    #[inline]
    pub fn get_token(&self) -> &TokenId {
        &self.token
    }

    #[inline]
    pub fn get_amount(&self) -> u64 {
        self.amount
    }
}

impl Serializer for TreasuryMintPayload {
    fn write(&self, writer: &mut Writer) {
        self.token.write(writer);
        writer.write_u64(self.amount);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let token = TokenId::read(reader)?;
        let amount = reader.read_u64()?;
        Ok(TreasuryMintPayload { token, amount })
    }

    fn size(&self) -> usize {
        self.token.size() + 8
    }
}
