use async_trait::async_trait;

use crate::{
    entity::{AccountId, TokenId},
    registry::NoteRegistry,
    token::{
        MemoryRelationStore, MemoryTokenStore, StoreError, Token, TokenRelation,
        TokenRelationStore, TokenStore, TokenType,
    },
};

/// The slice of host state a transaction runs against: the token and
/// relation stores, the note registry, and the record stream builder for
/// the block being produced.
#[async_trait]
pub trait TransferState: Send + Sync {
    /// Resolve a token definition that is usable for transfers
    async fn get_token(&self, id: &TokenId) -> Result<Token, StoreError>;

    /// Look up the relation for `(account, token)`
    async fn get_relation(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelation>, StoreError>;

    /// The note registry backing this state
    fn note_registry(&self) -> &NoteRegistry;

    /// Tag the emitted stream record with the token type the transaction
    /// touched
    fn set_record_token_type(&mut self, token_type: TokenType);
}

/// Prototype state wiring: in-memory stores, an in-memory registry and a
/// captured record tag. Hosts with durable stores implement
/// [`TransferState`] over their own storage instead.
pub struct InMemoryTransferState {
    tokens: MemoryTokenStore,
    relations: MemoryRelationStore,
    registry: NoteRegistry,
    record_token_type: Option<TokenType>,
}

impl InMemoryTransferState {
    pub fn new() -> Self {
        InMemoryTransferState {
            tokens: MemoryTokenStore::new(),
            relations: MemoryRelationStore::new(),
            registry: NoteRegistry::new(),
            record_token_type: None,
        }
    }

    #[inline]
    pub fn tokens(&self) -> &MemoryTokenStore {
        &self.tokens
    }

    #[inline]
    pub fn relations(&self) -> &MemoryRelationStore {
        &self.relations
    }

    #[inline]
    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    /// The record tag set by the last successful handle, if any
    #[inline]
    pub fn record_token_type(&self) -> Option<TokenType> {
        self.record_token_type
    }
}

impl Default for InMemoryTransferState {
    fn default() -> Self {
        InMemoryTransferState::new()
    }
}

#[async_trait]
impl TransferState for InMemoryTransferState {
    async fn get_token(&self, id: &TokenId) -> Result<Token, StoreError> {
        self.tokens.get_token(id).await
    }

    async fn get_relation(
        &self,
        account: &AccountId,
        token: &TokenId,
    ) -> Result<Option<TokenRelation>, StoreError> {
        self.relations.get_relation(account, token).await
    }

    fn note_registry(&self) -> &NoteRegistry {
        &self.registry
    }

    fn set_record_token_type(&mut self, token_type: TokenType) {
        self.record_token_type = Some(token_type);
    }
}
