mod store;

pub use store::*;

use serde::{Deserialize, Serialize};

use crate::{
    entity::{AccountId, TokenId},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// Classification of a token definition
/// Only `FungiblePrivate` tokens participate in confidential transfers
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    FungiblePrivate,
    Fungible,
    NonFungible,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::FungiblePrivate => "FungiblePrivate",
            TokenType::Fungible => "Fungible",
            TokenType::NonFungible => "NonFungible",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TokenType::FungiblePrivate),
            1 => Some(TokenType::Fungible),
            2 => Some(TokenType::NonFungible),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        match self {
            TokenType::FungiblePrivate => 0,
            TokenType::Fungible => 1,
            TokenType::NonFungible => 2,
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serializer for TokenType {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let value = reader.read_u8()?;
        TokenType::from_u8(value).ok_or(ReaderError::InvalidValue)
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.to_u8());
    }

    fn size(&self) -> usize {
        1
    }
}

/// Identifier of the key gating KYC grants for a token
/// Only its presence matters to transfer verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenKey([u8; 32]);

impl TokenKey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        TokenKey(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Serialize for TokenKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'a> Deserialize<'a> for TokenKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        use serde::de::Error as SerdeError;

        let hex = String::deserialize(deserializer)?;
        let decoded = hex::decode(hex).map_err(SerdeError::custom)?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| SerdeError::custom("token key must be 32 bytes"))?;
        Ok(TokenKey::new(bytes))
    }
}

impl Serializer for TokenKey {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes_32().map(TokenKey::new)
    }

    fn size(&self) -> usize {
        32
    }
}

/// A token definition as stored by the host
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    treasury: AccountId,
    token_type: TokenType,
    // When set, every participating account needs a KYC-granted relation
    kyc_key: Option<TokenKey>,
    deleted: bool,
}

impl Token {
    pub fn new(
        id: TokenId,
        treasury: AccountId,
        token_type: TokenType,
        kyc_key: Option<TokenKey>,
    ) -> Self {
        Token {
            id,
            treasury,
            token_type,
            kyc_key,
            deleted: false,
        }
    }

    #[inline]
    pub fn get_id(&self) -> &TokenId {
        &self.id
    }

    #[inline]
    pub fn get_treasury(&self) -> &AccountId {
        &self.treasury
    }

    #[inline]
    pub fn get_token_type(&self) -> TokenType {
        self.token_type
    }

    #[inline]
    pub fn get_kyc_key(&self) -> Option<&TokenKey> {
        self.kyc_key.as_ref()
    }

    #[inline]
    pub fn has_kyc_key(&self) -> bool {
        self.kyc_key.is_some()
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

/// Association between an account and a token
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRelation {
    kyc_granted: bool,
}

impl TokenRelation {
    pub fn new(kyc_granted: bool) -> Self {
        TokenRelation { kyc_granted }
    }

    #[inline]
    pub fn is_kyc_granted(&self) -> bool {
        self.kyc_granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_round_trip() {
        for token_type in [
            TokenType::FungiblePrivate,
            TokenType::Fungible,
            TokenType::NonFungible,
        ] {
            assert_eq!(TokenType::from_u8(token_type.to_u8()), Some(token_type));
            let restored = TokenType::from_bytes(&token_type.to_bytes()).unwrap();
            assert_eq!(restored, token_type);
        }

        assert_eq!(TokenType::from_u8(200), None);
    }

    #[test]
    fn test_token_kyc_key_presence() {
        let id = TokenId::new(0, 0, 9090);
        let treasury = AccountId::new(0, 0, 2);

        let open = Token::new(id, treasury, TokenType::FungiblePrivate, None);
        assert!(!open.has_kyc_key());

        let gated = Token::new(
            id,
            treasury,
            TokenType::FungiblePrivate,
            Some(TokenKey::new([7u8; 32])),
        );
        assert!(gated.has_kyc_key());
    }

    #[test]
    fn test_token_key_serde_round_trip() {
        let key = TokenKey::new([9u8; 32]);
        let json = serde_json::to_value(&key).unwrap();
        let restored: TokenKey = serde_json::from_value(json).unwrap();
        assert_eq!(key, restored);
    }
}
