// src/service/repository.rs
//! Repository collaborator interface and in-memory implementation.
//!
//! The repository abstracts where holder state lives: credential holders,
//! raw credentials (including pairwise-exchanged copies), and receipts,
//! keyed by string ids. Writes publish change events on a broadcast
//! channel so callers can keep live views without polling.
//!
//! The in-memory implementation backs tests and ephemeral wallets. For
//! production use, implement the trait over durable storage; the engine
//! only depends on the trait.

use crate::error::{SdkError, SdkResult};
use crate::models::credential::{VerifiableCredential, VerifiableCredentialHolder};
use crate::models::receipt::Receipt;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// A change published after a successful repository write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryEvent {
    /// A credential holder was inserted or replaced, by card id.
    HolderInserted(String),
    /// A credential holder was deleted, by card id.
    HolderDeleted(String),
    /// A credential was inserted, by jti.
    CredentialInserted(String),
    /// A receipt was appended, by receipt id.
    ReceiptInserted(String),
}

/// Storage collaborator consumed by the exchange engine.
///
/// Implementations must serialize concurrent writes per id; last-writer-wins
/// is acceptable because credential ids are content-addressed by token
/// `jti`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts or replaces a credential holder.
    async fn insert_holder(&self, holder: VerifiableCredentialHolder) -> SdkResult<()>;

    /// Deletes a credential holder by card id.
    async fn delete_holder(&self, card_id: &str) -> SdkResult<()>;

    /// Fetches a credential holder by card id.
    async fn get_holder(&self, card_id: &str) -> SdkResult<Option<VerifiableCredentialHolder>>;

    /// Returns all credential holders.
    async fn query_all_holders(&self) -> SdkResult<Vec<VerifiableCredentialHolder>>;

    /// Inserts a credential, keyed by its `jti`.
    async fn insert_credential(&self, credential: VerifiableCredential) -> SdkResult<()>;

    /// Returns all credentials correlated to one original credential id,
    /// i.e. the original plus its pairwise-exchanged copies.
    async fn get_credentials_by_pic_id(&self, pic_id: &str) -> SdkResult<Vec<VerifiableCredential>>;

    /// Appends a receipt.
    async fn insert_receipt(&self, receipt: Receipt) -> SdkResult<()>;

    /// Returns all receipts recorded for a credential id.
    async fn get_receipts_by_vc_id(&self, vc_id: &str) -> SdkResult<Vec<Receipt>>;

    /// Subscribes to change events for all future writes.
    fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent>;
}

#[derive(Default)]
struct Tables {
    holders: HashMap<String, VerifiableCredentialHolder>,
    credentials: HashMap<String, VerifiableCredential>,
    receipts: Vec<Receipt>,
}

/// In-memory [`Repository`] behind a mutex.
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    events: broadcast::Sender<RepositoryEvent>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        InMemoryRepository { tables: Mutex::new(Tables::default()), events }
    }

    fn lock(&self) -> SdkResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| SdkError::Repository("repository lock poisoned".to_string()))
    }

    fn publish(&self, event: RepositoryEvent) {
        // No receivers is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_holder(&self, holder: VerifiableCredentialHolder) -> SdkResult<()> {
        let card_id = holder.card_id.clone();
        self.lock()?.holders.insert(card_id.clone(), holder);
        self.publish(RepositoryEvent::HolderInserted(card_id));
        Ok(())
    }

    async fn delete_holder(&self, card_id: &str) -> SdkResult<()> {
        self.lock()?.holders.remove(card_id);
        self.publish(RepositoryEvent::HolderDeleted(card_id.to_string()));
        Ok(())
    }

    async fn get_holder(&self, card_id: &str) -> SdkResult<Option<VerifiableCredentialHolder>> {
        Ok(self.lock()?.holders.get(card_id).cloned())
    }

    async fn query_all_holders(&self) -> SdkResult<Vec<VerifiableCredentialHolder>> {
        Ok(self.lock()?.holders.values().cloned().collect())
    }

    async fn insert_credential(&self, credential: VerifiableCredential) -> SdkResult<()> {
        let jti = credential.jti.clone();
        self.lock()?.credentials.insert(jti.clone(), credential);
        self.publish(RepositoryEvent::CredentialInserted(jti));
        Ok(())
    }

    async fn get_credentials_by_pic_id(&self, pic_id: &str) -> SdkResult<Vec<VerifiableCredential>> {
        Ok(self
            .lock()?
            .credentials
            .values()
            .filter(|credential| credential.pic_id == pic_id)
            .cloned()
            .collect())
    }

    async fn insert_receipt(&self, receipt: Receipt) -> SdkResult<()> {
        let id = receipt.id.clone();
        self.lock()?.receipts.push(receipt);
        self.publish(RepositoryEvent::ReceiptInserted(id));
        Ok(())
    }

    async fn get_receipts_by_vc_id(&self, vc_id: &str) -> SdkResult<Vec<Receipt>> {
        Ok(self
            .lock()?
            .receipts
            .iter()
            .filter(|receipt| receipt.vc_id == vc_id)
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<RepositoryEvent> {
        self.events.subscribe()
    }
}
