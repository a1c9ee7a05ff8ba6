use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityIdError {
    #[error("entity id must have the form shard.realm.num")]
    InvalidFormat,
    #[error("entity id component is not a number")]
    InvalidComponent,
}

fn parse_triplet(value: &str) -> Result<(u64, u64, u64), EntityIdError> {
    let mut parts = value.split('.');
    let mut next = || {
        parts
            .next()
            .ok_or(EntityIdError::InvalidFormat)?
            .parse::<u64>()
            .map_err(|_| EntityIdError::InvalidComponent)
    };

    let shard = next()?;
    let realm = next()?;
    let num = next()?;
    if parts.next().is_some() {
        return Err(EntityIdError::InvalidFormat);
    }

    Ok((shard, realm, num))
}

/// Identifier of a token definition: (shard, realm, num)
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct TokenId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl TokenId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        TokenId { shard, realm, num }
    }

    #[inline]
    pub fn get_shard(&self) -> u64 {
        self.shard
    }

    #[inline]
    pub fn get_realm(&self) -> u64 {
        self.realm
    }

    #[inline]
    pub fn get_num(&self) -> u64 {
        self.num
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for TokenId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shard, realm, num) = parse_triplet(s)?;
        Ok(TokenId::new(shard, realm, num))
    }
}

impl Serializer for TokenId {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self.shard);
        writer.write_u64(self.realm);
        writer.write_u64(self.num);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let shard = reader.read_u64()?;
        let realm = reader.read_u64()?;
        let num = reader.read_u64()?;
        Ok(TokenId::new(shard, realm, num))
    }

    fn size(&self) -> usize {
        8 * 3
    }
}

/// Identifier of an account: (shard, realm, num)
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct AccountId {
    shard: u64,
    realm: u64,
    num: u64,
}

impl AccountId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        AccountId { shard, realm, num }
    }

    #[inline]
    pub fn get_shard(&self) -> u64 {
        self.shard
    }

    #[inline]
    pub fn get_realm(&self) -> u64 {
        self.realm
    }

    #[inline]
    pub fn get_num(&self) -> u64 {
        self.num
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shard, realm, num) = parse_triplet(s)?;
        Ok(AccountId::new(shard, realm, num))
    }
}

impl Serializer for AccountId {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self.shard);
        writer.write_u64(self.realm);
        writer.write_u64(self.num);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let shard = reader.read_u64()?;
        let realm = reader.read_u64()?;
        let num = reader.read_u64()?;
        Ok(AccountId::new(shard, realm, num))
    }

    fn size(&self) -> usize {
        8 * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let token: TokenId = "0.0.9090".parse().unwrap();
        assert_eq!(token, TokenId::new(0, 0, 9090));
        assert_eq!(token.to_string(), "0.0.9090");

        let account: AccountId = "1.2.3".parse().unwrap();
        assert_eq!(account, AccountId::new(1, 2, 3));
        assert_eq!(account.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert!("".parse::<TokenId>().is_err());
        assert!("0.0".parse::<TokenId>().is_err());
        assert!("0.0.1.2".parse::<TokenId>().is_err());
        assert!("a.b.c".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_serializer_round_trip() {
        let token = TokenId::new(0, 0, 9090);
        let restored = TokenId::from_bytes(&token.to_bytes()).unwrap();
        assert_eq!(token, restored);
        assert_eq!(token.to_bytes().len(), token.size());

        let account = AccountId::new(5, 0, 1234);
        let restored = AccountId::from_bytes(&account.to_bytes()).unwrap();
        assert_eq!(account, restored);
    }
}
