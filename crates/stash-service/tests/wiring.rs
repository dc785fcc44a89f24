//! End-to-end wiring tests: configuration in, working services out.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use stash_config::{CacheSettings, StashConfig, StorageSettings, TokenSettings};
use stash_core::Role;
use stash_db_document::DocumentCollection;
use stash_db_memory::InMemoryUserStore;
use stash_service::{
    CreateRecordRequest, RecordService, ServiceError, UpdateRecordRequest, build_auth_service,
    build_record_store,
};
use stash_storage::{StorageBackend, StorageResult};
use tokio::sync::RwLock;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn config(backend: StorageBackend, file_cache_path: PathBuf) -> StashConfig {
    StashConfig {
        cache: CacheSettings {
            file_cache_path,
            ..CacheSettings::default()
        },
        storage: StorageSettings { backend },
        token: TokenSettings {
            secret: SECRET.to_string(),
            issuer: "stash".to_string(),
            audience: "stash-clients".to_string(),
            expiration_minutes: 60,
        },
    }
}

/// In-memory document collection standing in for a real driver handle.
#[derive(Default)]
struct FakeCollection {
    docs: RwLock<HashMap<String, Value>>,
}

#[async_trait]
impl DocumentCollection for FakeCollection {
    async fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.docs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, document: Value) -> StorageResult<()> {
        self.docs.write().await.insert(key.to_string(), document);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.docs.write().await.remove(key).is_some())
    }

    async fn list(&self) -> StorageResult<Vec<Value>> {
        Ok(self.docs.read().await.values().cloned().collect())
    }
}

#[tokio::test]
async fn test_memory_backend_serves_crud_through_all_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(StorageBackend::Memory, dir.path().to_path_buf());

    let store = build_record_store(&config, None).await.unwrap();
    let service = RecordService::new(store);

    let created = service
        .create(CreateRecordRequest {
            value: "hello".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    // Second read comes from cache; the value must not change
    assert_eq!(service.get(1).await.unwrap().unwrap().value, "hello");
    assert_eq!(service.get(1).await.unwrap().unwrap().value, "hello");

    let updated = service
        .update(1, UpdateRecordRequest {
            value: "changed".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.value, "changed");
    assert_eq!(service.get(1).await.unwrap().unwrap().value, "changed");

    assert!(service.delete(1).await.unwrap());
    assert!(service.get(1).await.unwrap().is_none());
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_document_backend_via_factory() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(StorageBackend::DocumentDb, dir.path().to_path_buf());

    let collection = Arc::new(FakeCollection::default());
    let store = build_record_store(&config, Some(collection)).await.unwrap();
    let service = RecordService::new(store);

    let created = service
        .create(CreateRecordRequest {
            value: "documented".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(service.get(created.id).await.unwrap().unwrap().value, "documented");
}

#[tokio::test]
async fn test_document_backend_requires_collection() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(StorageBackend::DocumentDb, dir.path().to_path_buf());

    let result = build_record_store(&config, None).await;
    assert!(matches!(result, Err(ServiceError::MissingCollection)));
}

#[tokio::test]
async fn test_distributed_cache_requires_url_at_wiring_time() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(StorageBackend::Memory, dir.path().to_path_buf());
    config.cache.use_distributed_cache = true;
    config.cache.redis_url = None;

    let result = build_record_store(&config, None).await;
    assert!(matches!(result, Err(ServiceError::MissingRedisUrl)));
}

#[tokio::test]
async fn test_auth_service_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(StorageBackend::Memory, dir.path().to_path_buf());

    let auth = build_auth_service(Arc::new(InMemoryUserStore::new()), &config.token).unwrap();
    auth.register("alice", "s3cret", Role::Admin).await.unwrap();
    assert!(auth.login("alice", "s3cret").await.is_some());
    assert!(auth.login("alice", "wrong").await.is_none());
}

#[tokio::test]
async fn test_auth_wiring_rejects_weak_secret() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(StorageBackend::Memory, dir.path().to_path_buf());
    config.token.secret = "short".to_string();

    let result = build_auth_service(Arc::new(InMemoryUserStore::new()), &config.token);
    assert!(matches!(result, Err(ServiceError::Auth(_))));
}
