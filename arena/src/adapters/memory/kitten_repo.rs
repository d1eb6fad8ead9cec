//! In-memory adapter for KittenRepository

use async_trait::async_trait;

use super::db::MemoryDb;
use crate::domain::entities::{Kitten, KittenId, UserId};
use crate::domain::ports::{KittenReadRepository, KittenRepository};
use crate::domain::rules::{ExperienceGain, Progress, ProgressionEngine};
use crate::error::DomainError;

/// In-memory implementation of both kitten repository views
#[derive(Debug, Clone)]
pub struct InMemoryKittenRepository {
    db: MemoryDb,
}

impl InMemoryKittenRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KittenReadRepository for InMemoryKittenRepository {
    async fn find_by_id(&self, id: &KittenId) -> Result<Option<Kitten>, DomainError> {
        Ok(self.db.read().await.kittens.get(id).cloned())
    }

    async fn is_kitten_owned_by_user(
        &self,
        kitten_id: &KittenId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .db
            .read()
            .await
            .kittens
            .get(kitten_id)
            .is_some_and(|k| k.is_owned_by(user_id)))
    }
}

#[async_trait]
impl KittenRepository for InMemoryKittenRepository {
    async fn update_experience(
        &self,
        kitten_id: &KittenId,
        gain: ExperienceGain,
        progression: &ProgressionEngine,
    ) -> Result<Progress, DomainError> {
        let mut tables = self.db.write().await;
        let kitten = tables
            .kittens
            .get_mut(kitten_id)
            .ok_or(DomainError::KittenNotFound(*kitten_id))?;

        let after = progression.apply_gain(kitten, gain);
        let before = std::mem::replace(kitten, after.clone());
        Ok(Progress { before, after })
    }

    async fn update_stats(
        &self,
        winner_id: &KittenId,
        loser_id: &KittenId,
    ) -> Result<(), DomainError> {
        if winner_id == loser_id {
            return Err(DomainError::Validation(
                "Winner and loser must be different kittens".to_string(),
            ));
        }

        let mut tables = self.db.write().await;
        for id in [winner_id, loser_id] {
            if !tables.kittens.contains_key(id) {
                return Err(DomainError::KittenNotFound(*id));
            }
        }

        if let Some(winner) = tables.kittens.get_mut(winner_id) {
            winner.record_win();
        }
        if let Some(loser) = tables.kittens.get_mut(loser_id) {
            loser.record_loss();
        }
        Ok(())
    }

    async fn is_owner(&self, kitten_id: &KittenId, user_id: &UserId) -> Result<bool, DomainError> {
        self.is_kitten_owned_by_user(kitten_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_kitten;

    async fn repo_with(kittens: &[Kitten]) -> InMemoryKittenRepository {
        let db = MemoryDb::new();
        for kitten in kittens {
            db.insert_kitten(kitten.clone()).await;
        }
        InMemoryKittenRepository::new(db)
    }

    #[tokio::test]
    async fn find_by_id_found_and_missing() {
        let kitten = test_kitten();
        let repo = repo_with(&[kitten.clone()]).await;

        assert_eq!(repo.find_by_id(&kitten.id).await.unwrap(), Some(kitten));
        assert!(repo.find_by_id(&KittenId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn is_owner_false_for_unknown_kitten() {
        let kitten = test_kitten();
        let repo = repo_with(&[kitten.clone()]).await;

        assert!(repo.is_owner(&kitten.id, &kitten.owner_id).await.unwrap());
        assert!(!repo.is_owner(&kitten.id, &UserId::new()).await.unwrap());
        assert!(!repo
            .is_owner(&KittenId::new(), &kitten.owner_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn update_experience_applies_progression() {
        let kitten = test_kitten();
        let repo = repo_with(&[kitten.clone()]).await;
        let engine = ProgressionEngine::default();

        let progress = repo
            .update_experience(&kitten.id, ExperienceGain::new(150).unwrap(), &engine)
            .await
            .unwrap();

        assert_eq!(progress.before, kitten);
        assert_eq!(progress.after.level, 2);
        assert_eq!(progress.after.experience, 50);
        let stored = repo.find_by_id(&kitten.id).await.unwrap().unwrap();
        assert_eq!(stored, progress.after);
    }

    #[tokio::test]
    async fn update_experience_missing_kitten() {
        let repo = repo_with(&[]).await;

        let result = repo
            .update_experience(
                &KittenId::new(),
                ExperienceGain::new(10).unwrap(),
                &ProgressionEngine::default(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::KittenNotFound(_))));
    }

    #[tokio::test]
    async fn update_stats_records_win_and_loss() {
        let (winner, loser) = (test_kitten(), test_kitten());
        let repo = repo_with(&[winner.clone(), loser.clone()]).await;

        repo.update_stats(&winner.id, &loser.id).await.unwrap();

        let winner = repo.find_by_id(&winner.id).await.unwrap().unwrap();
        let loser = repo.find_by_id(&loser.id).await.unwrap().unwrap();
        assert_eq!((winner.wins, winner.losses), (1, 0));
        assert_eq!((loser.wins, loser.losses), (0, 1));
    }

    #[tokio::test]
    async fn update_stats_with_missing_loser_mutates_nothing() {
        let winner = test_kitten();
        let repo = repo_with(&[winner.clone()]).await;

        let result = repo.update_stats(&winner.id, &KittenId::new()).await;

        assert!(matches!(result, Err(DomainError::KittenNotFound(_))));
        let stored = repo.find_by_id(&winner.id).await.unwrap().unwrap();
        assert_eq!(stored.wins, 0);
    }

    #[tokio::test]
    async fn concurrent_stat_updates_do_not_interleave() {
        let (a, b) = (test_kitten(), test_kitten());
        let repo = std::sync::Arc::new(repo_with(&[a.clone(), b.clone()]).await);

        let mut handles = Vec::new();
        for i in 0..50 {
            let repo = repo.clone();
            let (w, l) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
            handles.push(tokio::spawn(async move { repo.update_stats(&w, &l).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let a = repo.find_by_id(&a.id).await.unwrap().unwrap();
        let b = repo.find_by_id(&b.id).await.unwrap().unwrap();
        assert_eq!(a.wins + a.losses, 50);
        assert_eq!(a.wins, b.losses);
        assert_eq!(a.losses, b.wins);
    }
}
