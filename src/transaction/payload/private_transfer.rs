use serde::{Deserialize, Serialize};

use crate::{
    entity::{AccountId, TokenId},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// A single transfer output: the receiving account and the compressed
/// commitment bytes of the note it will own.
///
/// Both fields arrive untrusted from the wire; the handler rejects
/// missing owners and malformed commitments with the appropriate codes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NoteOutput {
    owner: Option<AccountId>,
    #[serde(with = "hex::serde")]
    commitment: Vec<u8>,
}

impl NoteOutput {
    pub fn new(owner: Option<AccountId>, commitment: Vec<u8>) -> Self {
        NoteOutput { owner, commitment }
    }

    #[inline]
    pub fn get_owner(&self) -> Option<&AccountId> {
        self.owner.as_ref()
    }

    #[inline]
    pub fn get_commitment(&self) -> &[u8] {
        &self.commitment
    }
}

impl Serializer for NoteOutput {
    fn write(&self, writer: &mut Writer) {
        self.owner.write(writer);
        self.commitment.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let owner = Option::read(reader)?;
        let commitment = Vec::<u8>::read(reader)?;
        Ok(NoteOutput { owner, commitment })
    }

    fn size(&self) -> usize {
        self.owner.size() + self.commitment.size()
    }
}

/// PrivateTransferPayload consumes previously issued notes and emits new
/// ones such that the hidden total is conserved.
///
/// Inputs reference outstanding registry notes by their commitment bytes.
/// Outputs name the new owners together with fresh commitments produced by
/// the sender. The optional zk proof blob is carried opaquely; this
/// prototype logs its size and never interprets it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrivateTransferPayload {
    token: TokenId,
    #[serde(with = "hex_seq")]
    inputs: Vec<Vec<u8>>,
    outputs: Vec<NoteOutput>,
    #[serde(with = "hex_opt")]
    zk_proof: Option<Vec<u8>>,
}

impl PrivateTransferPayload {
    pub fn new(
        token: TokenId,
        inputs: Vec<Vec<u8>>,
        outputs: Vec<NoteOutput>,
        zk_proof: Option<Vec<u8>>,
    ) -> Self {
        PrivateTransferPayload {
            token,
            inputs,
            outputs,
            zk_proof,
        }
    }

    #[inline]
    pub fn get_token(&self) -> &TokenId {
        &self.token
    }

    #[inline]
    pub fn get_inputs(&self) -> &[Vec<u8>] {
        &self.inputs
    }

    #[inline]
    pub fn get_outputs(&self) -> &[NoteOutput] {
        &self.outputs
    }

    #[inline]
    pub fn get_zk_proof(&self) -> Option<&[u8]> {
        self.zk_proof.as_deref()
    }
}

impl Serializer for PrivateTransferPayload {
    fn write(&self, writer: &mut Writer) {
        self.token.write(writer);

        writer.write_u16(self.inputs.len() as u16);
        for input in &self.inputs {
            input.write(writer);
        }

        writer.write_u16(self.outputs.len() as u16);
        for output in &self.outputs {
            output.write(writer);
        }

        self.zk_proof.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let token = TokenId::read(reader)?;

        let count = reader.read_u16()? as usize;
        let mut inputs = Vec::with_capacity(count);
        for _ in 0..count {
            inputs.push(Vec::<u8>::read(reader)?);
        }

        let count = reader.read_u16()? as usize;
        let mut outputs = Vec::with_capacity(count);
        for _ in 0..count {
            outputs.push(NoteOutput::read(reader)?);
        }

        let zk_proof = Option::read(reader)?;

        Ok(PrivateTransferPayload {
            token,
            inputs,
            outputs,
            zk_proof,
        })
    }

    fn size(&self) -> usize {
        self.token.size()
            + 2
            + self.inputs.iter().map(Serializer::size).sum::<usize>()
            + 2
            + self.outputs.iter().map(Serializer::size).sum::<usize>()
            + self.zk_proof.size()
    }
}

// Hex-encode sequences of byte strings for the JSON representation
mod hex_seq {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|value| hex::decode(value).map_err(Error::custom))
            .collect()
    }
}

// Hex-encode an optional byte string for the JSON representation
mod hex_opt {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|string| hex::decode(string).map_err(Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_payload() -> PrivateTransferPayload {
        PrivateTransferPayload::new(
            TokenId::new(0, 0, 9090),
            vec![vec![0x02; 33], vec![0x03; 33]],
            vec![
                NoteOutput::new(Some(AccountId::new(0, 0, 1002)), vec![0x02; 33]),
                NoteOutput::new(None, vec![]),
            ],
            Some(vec![1, 2, 3]),
        )
    }

    #[test]
    fn test_payload_serializer_round_trip() {
        let payload = create_test_payload();
        let bytes = payload.to_bytes();
        assert_eq!(bytes.len(), payload.size());

        let restored = PrivateTransferPayload::from_bytes(&bytes).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_payload_serde_round_trip() {
        let payload = create_test_payload();
        let json = serde_json::to_value(&payload).unwrap();
        let restored: PrivateTransferPayload = serde_json::from_value(json).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let payload = create_test_payload();
        let bytes = payload.to_bytes();
        assert!(PrivateTransferPayload::from_bytes(&bytes[..bytes.len() - 2]).is_err());
    }
}
