//! In-memory stores used by service and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::token_repo::{TokenRow, TokenStore};
use crate::repos::user_repo::{UserRow, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, UserRow>>,
}

impl MemoryUserStore {
    pub fn get_by_account(&self, account: &str) -> Option<UserRow> {
        let users = self.users.lock().unwrap();
        users.values().find(|u| u.account == account).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_account(&self, account: &str) -> RepoResult<Option<UserRow>> {
        Ok(self.get_by_account(account))
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert(&self, account: &str, password_hash: &str) -> RepoResult<UserRow> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.account == account) {
            return Err(RepoError::Conflict);
        }

        let row = UserRow {
            user_id: Uuid::new_v4(),
            account: account.to_string(),
            password: password_hash.to_string(),
        };
        users.insert(row.user_id, row.clone());
        Ok(row)
    }
}

#[derive(Debug, Default)]
struct TokenTable {
    rows: HashMap<i64, TokenRow>,
    next_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    table: Mutex<TokenTable>,
}

impl MemoryTokenStore {
    pub fn rows_for_user(&self, user_id: Uuid) -> Vec<TokenRow> {
        let table = self.table.lock().unwrap();
        table
            .rows
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_refresh_token_hash(&self, token_hash: &[u8]) -> RepoResult<Option<TokenRow>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .values()
            .find(|r| r.refresh_token_hash == token_hash)
            .cloned())
    }

    async fn upsert_for_user(&self, user_id: Uuid, token_hash: Vec<u8>) -> RepoResult<TokenRow> {
        let mut table = self.table.lock().unwrap();

        if let Some(row) = table.rows.values_mut().find(|r| r.user_id == user_id) {
            row.refresh_token_hash = token_hash;
            row.updated_at = Utc::now();
            return Ok(row.clone());
        }

        table.next_id += 1;
        let row = TokenRow {
            token_id: table.next_id,
            user_id,
            refresh_token_hash: token_hash,
            updated_at: Utc::now(),
        };
        table.rows.insert(row.token_id, row.clone());
        Ok(row)
    }

    async fn rotate(
        &self,
        token_id: i64,
        current_hash: &[u8],
        next_hash: Vec<u8>,
    ) -> RepoResult<bool> {
        let mut table = self.table.lock().unwrap();
        match table.rows.get_mut(&token_id) {
            Some(row) if row.refresh_token_hash == current_hash => {
                row.refresh_token_hash = next_hash;
                row.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_keeps_one_row_per_user() {
        let store = MemoryTokenStore::default();
        let user_id = Uuid::new_v4();

        let first = store.upsert_for_user(user_id, vec![1]).await.unwrap();
        let second = store.upsert_for_user(user_id, vec![2]).await.unwrap();

        assert_eq!(first.token_id, second.token_id);
        let rows = store.rows_for_user(user_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].refresh_token_hash, vec![2]);
    }

    #[tokio::test]
    async fn rotate_requires_current_hash() {
        let store = MemoryTokenStore::default();
        let row = store.upsert_for_user(Uuid::new_v4(), vec![1]).await.unwrap();

        assert!(store.rotate(row.token_id, &[1], vec![2]).await.unwrap());
        // Stale value: someone already rotated it.
        assert!(!store.rotate(row.token_id, &[1], vec![3]).await.unwrap());
        assert!(store.find_by_refresh_token_hash(&[2]).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_account_conflicts() {
        let store = MemoryUserStore::default();
        store.insert("alice", "hash").await.unwrap();

        let err = store.insert("alice", "hash").await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }
}
