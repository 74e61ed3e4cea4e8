//! In-memory reaction-role bindings.
//!
//! One `RwLock` owns the table: mutations take the write half only for the
//! in-memory change, lookups from the dispatcher share the read half. A
//! separate writer lock keeps mutations exclusive across their save, which
//! runs on the blocking pool. No lock is ever held across a platform call.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{
    errors::{PersistenceWarning, RegistryError, StoreError},
    models::{BindingTable, ChannelId, EmojiKey, MessageBinding, MessageId, RoleId},
    store::Store,
};

/// Result of a mutation that succeeded in memory.
///
/// `warning` is set when the change could not be written to disk. The
/// mutation is kept either way.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

pub struct Registry {
    table: RwLock<BindingTable>,
    writer: Mutex<()>,
    store: Arc<dyn Store>,
}

impl Registry {
    /// Builds the registry from whatever the store holds. Unreadable state
    /// degrades to an empty table.
    pub fn open(store: Arc<dyn Store>) -> Self {
        let table = match store.load() {
            Ok(table) => {
                tracing::info!("Loaded {} reaction-role binding(s)", table.len());
                table
            }
            Err(e) => {
                tracing::warn!("Starting with an empty binding table: {}", e);
                BindingTable::new()
            }
        };

        Self {
            table: RwLock::new(table),
            writer: Mutex::new(()),
            store,
        }
    }

    pub async fn create_binding(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<Committed<MessageBinding>, RegistryError> {
        let _writer = self.writer.lock().await;
        let (binding, snapshot) = {
            let mut table = self.table.write().await;
            if table.contains_key(&message_id) {
                return Err(RegistryError::DuplicateBinding(message_id));
            }

            let binding = MessageBinding::new(channel_id);
            table.insert(message_id, binding.clone());
            (binding, table.clone())
        };
        let warning = self.persist(snapshot).await;

        Ok(Committed {
            value: binding,
            warning,
        })
    }

    /// Maps `emoji` to `role_id` on an existing binding. Returns the role the
    /// emoji was previously mapped to, if any.
    pub async fn add_mapping(
        &self,
        message_id: MessageId,
        emoji: EmojiKey,
        role_id: RoleId,
    ) -> Result<Committed<Option<RoleId>>, RegistryError> {
        let _writer = self.writer.lock().await;
        let (previous, snapshot) = {
            let mut table = self.table.write().await;
            let binding = table
                .get_mut(&message_id)
                .ok_or(RegistryError::UnknownMessage(message_id))?;

            let previous = binding.emoji_map.insert(emoji, role_id);
            (previous, table.clone())
        };
        let warning = self.persist(snapshot).await;

        Ok(Committed {
            value: previous,
            warning,
        })
    }

    /// Drops one mapping. The binding itself stays, even when emptied.
    pub async fn remove_mapping(
        &self,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> Result<Committed<RoleId>, RegistryError> {
        let _writer = self.writer.lock().await;
        let (removed, snapshot) = {
            let mut table = self.table.write().await;
            let binding = table
                .get_mut(&message_id)
                .ok_or(RegistryError::UnknownMessage(message_id))?;

            let removed = binding
                .emoji_map
                .remove(emoji)
                .ok_or_else(|| RegistryError::UnknownMapping {
                    message_id,
                    emoji: emoji.clone(),
                })?;
            (removed, table.clone())
        };
        let warning = self.persist(snapshot).await;

        Ok(Committed {
            value: removed,
            warning,
        })
    }

    /// Snapshot of every binding, ordered by message id.
    pub async fn list_bindings(&self) -> Vec<(MessageId, MessageBinding)> {
        self.table
            .read()
            .await
            .iter()
            .map(|(id, binding)| (*id, binding.clone()))
            .collect()
    }

    pub async fn binding(&self, message_id: MessageId) -> Option<MessageBinding> {
        self.table.read().await.get(&message_id).cloned()
    }

    /// Hot path for reaction events. Absence is the common case and is not
    /// an error.
    pub async fn lookup(&self, message_id: MessageId, emoji: &str) -> Option<RoleId> {
        self.table.read().await.get(&message_id)?.role_for(emoji)
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.len()
    }

    // Disk I/O runs on the blocking pool; the caller holds the writer lock.
    async fn persist(&self, snapshot: BindingTable) -> Option<PersistenceWarning> {
        let store = self.store.clone();
        let saved = tokio::task::spawn_blocking(move || store.save(&snapshot))
            .await
            .unwrap_or_else(|e| Err(StoreError::from(e)));

        match saved {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Failed to persist reaction-role bindings: {}", e);
                Some(PersistenceWarning(e))
            }
        }
    }
}
