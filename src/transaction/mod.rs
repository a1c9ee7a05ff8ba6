pub mod payload;
pub mod verify;


pub use payload::{NoteOutput, PrivateTransferPayload, TreasuryMintPayload};

use serde::{Deserialize, Serialize};

use crate::{
    entity::AccountId,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// The operation carried by a transaction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionData {
    PrivateTransfer(PrivateTransferPayload),
    TreasuryMint(TreasuryMintPayload),
}

impl Serializer for TransactionData {
    fn write(&self, writer: &mut Writer) {
        match self {
            TransactionData::PrivateTransfer(payload) => {
                writer.write_u8(0);
                payload.write(writer);
            }
            TransactionData::TreasuryMint(payload) => {
                writer.write_u8(1);
                payload.write(writer);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        match reader.read_u8()? {
            0 => Ok(TransactionData::PrivateTransfer(
                PrivateTransferPayload::read(reader)?,
            )),
            1 => Ok(TransactionData::TreasuryMint(TreasuryMintPayload::read(
                reader,
            )?)),
            // A body without a recognized payload never constructs
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn size(&self) -> usize {
        1 + match self {
            TransactionData::PrivateTransfer(payload) => payload.size(),
            TransactionData::TreasuryMint(payload) => payload.size(),
        }
    }
}

/// A transaction as delivered by the host framework: the payer whose
/// authentication the host already performed, plus the operation payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    payer: AccountId,
    data: TransactionData,
}

impl Transaction {
    pub fn new(payer: AccountId, data: TransactionData) -> Self {
        Transaction { payer, data }
    }

    #[inline]
    pub fn get_payer(&self) -> &AccountId {
        &self.payer
    }

    #[inline]
    pub fn get_data(&self) -> &TransactionData {
        &self.data
    }
}

impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        self.payer.write(writer);
        self.data.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let payer = AccountId::read(reader)?;
        let data = TransactionData::read(reader)?;
        Ok(Transaction { payer, data })
    }

    fn size(&self) -> usize {
        self.payer.size() + self.data.size()
    }
}
