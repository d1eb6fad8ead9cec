//! Kitten service
//!
//! Owner-only experience grants routed through the progression engine.

use std::sync::Arc;

use serde::Serialize;

use crate::app::requests::GainExperience;
use crate::domain::entities::{Kitten, KittenId, UserId};
use crate::domain::ports::KittenRepository;
use crate::domain::rules::ProgressionEngine;
use crate::error::{AppError, DomainError};

/// Result of an experience grant
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub kitten: Kitten,
    pub levels_gained: u32,
    pub skill_points_gained: u32,
}

pub struct KittenService<KR>
where
    KR: KittenRepository,
{
    kittens: Arc<KR>,
    progression: ProgressionEngine,
}

impl<KR> KittenService<KR>
where
    KR: KittenRepository,
{
    pub fn new(kittens: Arc<KR>, progression: ProgressionEngine) -> Self {
        Self {
            kittens,
            progression,
        }
    }

    pub async fn find_by_id(&self, id: &KittenId) -> Result<Kitten, AppError> {
        self.kittens
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::KittenNotFound(*id).into())
    }

    /// Grant experience to one of the user's kittens, applying every
    /// level-up it pays for
    pub async fn gain_experience(
        &self,
        user_id: &UserId,
        kitten_id: &KittenId,
        command: GainExperience,
    ) -> Result<ProgressReport, AppError> {
        self.find_by_id(kitten_id).await?;
        if !self.kittens.is_owner(kitten_id, user_id).await? {
            tracing::warn!(
                kitten_id = %kitten_id,
                user_id = %user_id,
                "Rejected experience grant by non-owner"
            );
            return Err(DomainError::Unauthorized(format!(
                "User {} does not own kitten {}",
                user_id, kitten_id
            ))
            .into());
        }

        let progression = match command.skill_points_per_level {
            Some(points) => self.progression.with_skill_points_per_level(points),
            None => self.progression.clone(),
        };

        let progress = self
            .kittens
            .update_experience(kitten_id, command.gain, &progression)
            .await?;

        let report = ProgressReport {
            levels_gained: progress.levels_gained(),
            skill_points_gained: progress.skill_points_gained(),
            kitten: progress.after,
        };

        tracing::info!(
            kitten_id = %kitten_id,
            gain = command.gain.get(),
            level = report.kitten.level,
            levels_gained = report.levels_gained,
            "Experience applied"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryKittenRepository, MemoryDb};
    use crate::app::requests::GainExperienceRequest;
    use crate::test_utils::test_kitten;

    async fn create_service(kittens: &[Kitten]) -> KittenService<InMemoryKittenRepository> {
        let db = MemoryDb::new();
        for kitten in kittens {
            db.insert_kitten(kitten.clone()).await;
        }
        KittenService::new(
            Arc::new(InMemoryKittenRepository::new(db)),
            ProgressionEngine::default(),
        )
    }

    fn command(experience: i64, skill_points_per_level: Option<i64>) -> GainExperience {
        GainExperienceRequest {
            experience,
            skill_points_per_level,
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn gain_experience_levels_up_owner_kitten() {
        let kitten = test_kitten();
        let service = create_service(&[kitten.clone()]).await;

        let report = service
            .gain_experience(&kitten.owner_id, &kitten.id, command(350, None))
            .await
            .unwrap();

        // 100 + 200 consumed, 50 carried
        assert_eq!(report.kitten.level, 3);
        assert_eq!(report.kitten.experience, 50);
        assert_eq!(report.levels_gained, 2);
        assert_eq!(report.skill_points_gained, 6);
    }

    #[tokio::test]
    async fn gain_experience_with_skill_point_override() {
        let kitten = test_kitten();
        let service = create_service(&[kitten.clone()]).await;

        let report = service
            .gain_experience(&kitten.owner_id, &kitten.id, command(100, Some(7)))
            .await
            .unwrap();

        assert_eq!(report.kitten.skill_points, 7);
    }

    #[tokio::test]
    async fn gain_experience_by_stranger_is_unauthorized() {
        let kitten = test_kitten();
        let service = create_service(&[kitten.clone()]).await;

        let err = service
            .gain_experience(&UserId::new(), &kitten.id, command(100, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Unauthorized(_))));
        let stored = service.find_by_id(&kitten.id).await.unwrap();
        assert_eq!(stored.experience, 0);
        assert_eq!(stored.level, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_grants_report_every_level_once() {
        let kitten = test_kitten();
        let service = Arc::new(create_service(&[kitten.clone()]).await);

        // 10 * 100 = 100 + 200 + 300 + 400, exactly four level-ups
        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            let (owner, id) = (kitten.owner_id, kitten.id);
            handles.push(tokio::spawn(async move {
                service.gain_experience(&owner, &id, command(100, None)).await
            }));
        }
        let mut levels = 0;
        let mut skill_points = 0;
        for handle in handles {
            let report = handle.await.unwrap().unwrap();
            levels += report.levels_gained;
            skill_points += report.skill_points_gained;
        }

        let stored = service.find_by_id(&kitten.id).await.unwrap();
        assert_eq!(stored.level, 5);
        assert_eq!(stored.experience, 0);
        assert_eq!(levels, 4);
        assert_eq!(skill_points, stored.skill_points);
    }

    #[tokio::test]
    async fn gain_experience_missing_kitten() {
        let service = create_service(&[]).await;

        let err = service
            .gain_experience(&UserId::new(), &KittenId::new(), command(1, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Domain(DomainError::KittenNotFound(_))
        ));
    }
}
