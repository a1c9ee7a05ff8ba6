use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::entity::{AccountId, TokenId};

use super::{Token, TokenRelation};

// Upstream store failures carry their own codes, distinct from the
// transfer handler's failure table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("token {0} does not exist")]
    TokenNotFound(TokenId),
    #[error("token {0} was deleted")]
    TokenDeleted(TokenId),
}

/// Read access to token definitions
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Resolve a token that is usable for transfers
    /// Missing and deleted tokens fail with their respective codes
    async fn get_token(&self, id: &TokenId) -> Result<Token, StoreError>;
}

/// Read access to account/token associations
#[async_trait]
pub trait TokenRelationStore: Send + Sync {
    /// Look up the relation for `(account, token)`, `None` when the
    /// account never associated with the token
    async fn get_relation(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelation>, StoreError>;
}

/// In-memory token store for the prototype wiring and tests
pub struct MemoryTokenStore {
    tokens: DashMap<TokenId, Token>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore {
            tokens: DashMap::new(),
        }
    }

    pub fn insert(&self, token: Token) {
        self.tokens.insert(*token.get_id(), token);
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        MemoryTokenStore::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self, id: &TokenId) -> Result<Token, StoreError> {
        let token = self
            .tokens
            .get(id)
            .ok_or(StoreError::TokenNotFound(*id))?
            .value()
            .clone();

        if token.is_deleted() {
            return Err(StoreError::TokenDeleted(*id));
        }

        Ok(token)
    }
}

/// In-memory relation store for the prototype wiring and tests
pub struct MemoryRelationStore {
    relations: DashMap<(AccountId, TokenId), TokenRelation>,
}

impl MemoryRelationStore {
    pub fn new() -> Self {
        MemoryRelationStore {
            relations: DashMap::new(),
        }
    }

    /// Associate an account with a token
    pub fn associate(&self, account: AccountId, token: TokenId, kyc_granted: bool) {
        self.relations
            .insert((account, token), TokenRelation::new(kyc_granted));
    }

    pub fn dissociate(&self, account: &AccountId, token: &TokenId) {
        self.relations.remove(&(*account, *token));
    }
}

impl Default for MemoryRelationStore {
    fn default() -> Self {
        MemoryRelationStore::new()
    }
}

#[async_trait]
impl TokenRelationStore for MemoryRelationStore {
    async fn get_relation(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelation>, StoreError> {
        Ok(self
            .relations
            .get(&(*account, *token))
            .map(|relation| *relation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    const TOKEN: TokenId = TokenId::new(0, 0, 9090);
    const TREASURY: AccountId = AccountId::new(0, 0, 2);
    const ACCOUNT: AccountId = AccountId::new(0, 0, 1001);

    #[tokio::test]
    async fn test_token_store_lookup() {
        let store = MemoryTokenStore::new();
        assert_eq!(
            store.get_token(&TOKEN).await,
            Err(StoreError::TokenNotFound(TOKEN))
        );

        store.insert(Token::new(TOKEN, TREASURY, TokenType::FungiblePrivate, None));
        let token = store.get_token(&TOKEN).await.unwrap();
        assert_eq!(token.get_token_type(), TokenType::FungiblePrivate);
    }

    #[tokio::test]
    async fn test_deleted_token_is_unusable() {
        let store = MemoryTokenStore::new();
        let mut token = Token::new(TOKEN, TREASURY, TokenType::FungiblePrivate, None);
        token.mark_deleted();
        store.insert(token);

        assert_eq!(
            store.get_token(&TOKEN).await,
            Err(StoreError::TokenDeleted(TOKEN))
        );
    }

    #[tokio::test]
    async fn test_relation_store_lookup() {
        let store = MemoryRelationStore::new();
        assert_eq!(store.get_relation(&ACCOUNT, &TOKEN).await.unwrap(), None);

        store.associate(ACCOUNT, TOKEN, true);
        let relation = store.get_relation(&ACCOUNT, &TOKEN).await.unwrap().unwrap();
        assert!(relation.is_kyc_granted());

        store.dissociate(&ACCOUNT, &TOKEN);
        assert_eq!(store.get_relation(&ACCOUNT, &TOKEN).await.unwrap(), None);
    }
}
