use dashmap::{mapref::entry::Entry, DashMap};
use indexmap::IndexMap;
use log::debug;

use crate::{
    crypto::CompressedCommitment,
    entity::{AccountId, TokenId},
    note::PrivateNote,
};

/// Authoritative registry of outstanding notes, keyed by
/// `(token, commitment)`. At most one note exists per key.
///
/// Individual operations are linearizable (sharded locking per token);
/// composite sequences such as check-then-consume are NOT atomic at this
/// layer. The transfer handler owns that atomicity by validating first and
/// mutating last, under serial dispatch by the host.
///
/// The registry is purely in-memory: a restart forgets every outstanding
/// note. A durable deployment would persist the same key/value shape.
pub struct NoteRegistry {
    notes: DashMap<TokenId, IndexMap<CompressedCommitment, PrivateNote>>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        NoteRegistry {
            notes: DashMap::new(),
        }
    }

    /// Insert or overwrite the note at `(note.token, note.commitment)`,
    /// returning any previous note at that key
    pub fn put(&self, note: PrivateNote) -> Option<PrivateNote> {
        let token = *note.get_token();
        let commitment = note.get_commitment().clone();
        self.notes
            .entry(token)
            .or_default()
            .insert(commitment, note)
    }

    /// Look up the note at `(token, commitment)`
    pub fn get(&self, token: &TokenId, commitment: &CompressedCommitment) -> Option<PrivateNote> {
        self.notes
            .get(token)
            .and_then(|inner| inner.get(commitment).cloned())
    }

    /// Remove and return the note at `(token, commitment)`.
    /// The per-token map is dropped once its last note is consumed.
    pub fn remove(
        &self,
        token: &TokenId,
        commitment: &CompressedCommitment,
    ) -> Option<PrivateNote> {
        match self.notes.entry(*token) {
            Entry::Occupied(mut entry) => {
                let note = entry.get_mut().shift_remove(commitment);
                if entry.get().is_empty() {
                    entry.remove();
                }

                note
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Snapshot of the outstanding notes for a token, in insertion order
    pub fn get_notes(&self, token: &TokenId) -> Vec<PrivateNote> {
        self.notes
            .get(token)
            .map(|inner| inner.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every note. Intended for test isolation.
    pub fn clear(&self) {
        self.notes.clear();
    }

    /// Total outstanding notes across all tokens
    pub fn len(&self) -> usize {
        self.notes.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mint a treasury note and register it in one step.
    /// This is the only path that creates `known` notes.
    pub fn mint_treasury_note(
        &self,
        token: TokenId,
        owner: AccountId,
        amount: u64,
    ) -> PrivateNote {
        let note = PrivateNote::new_treasury(token, owner, amount);
        debug!(
            "minted treasury note {} for token {} owned by {}",
            note.get_commitment(),
            token,
            owner
        );

        self.put(note.clone());
        note
    }
}

impl Default for NoteRegistry {
    fn default() -> Self {
        NoteRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: TokenId = TokenId::new(0, 0, 9090);
    const OTHER_TOKEN: TokenId = TokenId::new(0, 0, 9091);
    const OWNER: AccountId = AccountId::new(0, 0, 1001);

    fn sample_note(token: TokenId, amount: u64) -> PrivateNote {
        PrivateNote::new_treasury(token, OWNER, amount)
    }

    #[test]
    fn test_put_get_remove_identity() {
        let registry = NoteRegistry::new();
        let note = sample_note(TOKEN, 100);
        let commitment = note.get_commitment().clone();

        assert!(registry.put(note.clone()).is_none());
        assert_eq!(registry.get(&TOKEN, &commitment), Some(note.clone()));

        assert_eq!(registry.remove(&TOKEN, &commitment), Some(note));
        assert_eq!(registry.get(&TOKEN, &commitment), None);
        assert_eq!(registry.remove(&TOKEN, &commitment), None);
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let registry = NoteRegistry::new();
        let note = sample_note(TOKEN, 100);
        let replacement = PrivateNote::external(
            TOKEN,
            AccountId::new(0, 0, 42),
            note.get_commitment().clone(),
        );

        registry.put(note.clone());
        assert_eq!(registry.put(replacement.clone()), Some(note));
        assert_eq!(
            registry.get(&TOKEN, replacement.get_commitment()),
            Some(replacement)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_tokens_are_isolated() {
        let registry = NoteRegistry::new();
        let note = sample_note(TOKEN, 100);
        let commitment = note.get_commitment().clone();
        registry.put(note);

        assert_eq!(registry.get(&OTHER_TOKEN, &commitment), None);
        assert_eq!(registry.remove(&OTHER_TOKEN, &commitment), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_inner_map_dropped_when_emptied() {
        let registry = NoteRegistry::new();
        let note = sample_note(TOKEN, 100);
        let commitment = note.get_commitment().clone();

        registry.put(note);
        registry.remove(&TOKEN, &commitment);

        // The per-token entry itself is gone, not just emptied
        assert!(registry.notes.get(&TOKEN).is_none());
    }

    #[test]
    fn test_clear() {
        let registry = NoteRegistry::new();
        registry.put(sample_note(TOKEN, 1));
        registry.put(sample_note(TOKEN, 2));
        registry.put(sample_note(OTHER_TOKEN, 3));
        assert_eq!(registry.len(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_mint_treasury_note_registers() {
        let registry = NoteRegistry::new();
        let note = registry.mint_treasury_note(TOKEN, OWNER, 500);

        assert_eq!(registry.get(&TOKEN, note.get_commitment()), Some(note));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_put_and_remove() {
        let registry = NoteRegistry::new();
        let notes: Vec<_> = (0..64).map(|i| sample_note(TOKEN, i)).collect();

        let registry_ref = &registry;
        std::thread::scope(|scope| {
            for chunk in notes.chunks(16) {
                scope.spawn(move || {
                    for note in chunk {
                        registry_ref.put(note.clone());
                        assert!(registry_ref
                            .get(note.get_token(), note.get_commitment())
                            .is_some());
                    }
                });
            }
        });
        assert_eq!(registry.len(), 64);

        std::thread::scope(|scope| {
            for chunk in notes.chunks(16) {
                scope.spawn(move || {
                    for note in chunk {
                        assert!(registry_ref
                            .remove(note.get_token(), note.get_commitment())
                            .is_some());
                    }
                });
            }
        });
        assert!(registry.is_empty());
    }
}
