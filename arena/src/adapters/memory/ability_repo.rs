//! In-memory adapter for AbilityRepository
//!
//! Keeps each kitten's `abilities` list in step with the ability table.

use async_trait::async_trait;

use super::db::MemoryDb;
use crate::domain::entities::{Ability, AbilityId, KittenId};
use crate::domain::ports::AbilityRepository;
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct InMemoryAbilityRepository {
    db: MemoryDb,
}

impl InMemoryAbilityRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn sorted(mut abilities: Vec<Ability>) -> Vec<Ability> {
    abilities.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    abilities
}

#[async_trait]
impl AbilityRepository for InMemoryAbilityRepository {
    async fn find_by_id(&self, id: &AbilityId) -> Result<Option<Ability>, DomainError> {
        Ok(self.db.read().await.abilities.get(id).cloned())
    }

    async fn find_by_kitten_id(&self, kitten_id: &KittenId) -> Result<Vec<Ability>, DomainError> {
        let tables = self.db.read().await;
        Ok(sorted(
            tables
                .abilities
                .values()
                .filter(|a| a.belongs_to(kitten_id))
                .cloned()
                .collect(),
        ))
    }

    async fn find_all(&self) -> Result<Vec<Ability>, DomainError> {
        let tables = self.db.read().await;
        Ok(sorted(tables.abilities.values().cloned().collect()))
    }

    async fn save(&self, ability: &Ability) -> Result<Ability, DomainError> {
        let mut tables = self.db.write().await;
        let previous_owner = tables
            .abilities
            .insert(ability.id, ability.clone())
            .and_then(|old| old.kitten_id);

        if let Some(old) = previous_owner {
            tables.sync_kitten_abilities(&old);
        }
        if let Some(new) = ability.kitten_id {
            tables.sync_kitten_abilities(&new);
        }
        Ok(ability.clone())
    }

    async fn delete(&self, id: &AbilityId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;
        match tables.abilities.remove(id) {
            Some(removed) => {
                if let Some(kitten_id) = removed.kitten_id {
                    tables.sync_kitten_abilities(&kitten_id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn bind(&self, id: &AbilityId, kitten_id: &KittenId) -> Result<Ability, DomainError> {
        let mut tables = self.db.write().await;
        let ability = tables
            .abilities
            .get_mut(id)
            .ok_or(DomainError::AbilityNotFound(*id))?;

        match ability.kitten_id {
            Some(current) if current == *kitten_id => return Ok(ability.clone()),
            Some(current) => {
                return Err(DomainError::InvalidState(format!(
                    "Ability {} is already bound to kitten {}",
                    id, current
                )))
            }
            None => {}
        }

        ability.kitten_id = Some(*kitten_id);
        let bound = ability.clone();
        tables.sync_kitten_abilities(kitten_id);
        Ok(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_ability, test_kitten};

    #[tokio::test]
    async fn find_by_kitten_id_unknown_kitten_is_empty() {
        let repo = InMemoryAbilityRepository::new(MemoryDb::new());
        repo.save(&test_ability("Pounce", None)).await.unwrap();

        let found = repo.find_by_kitten_id(&KittenId::new()).await.unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn find_all_is_sorted_by_name() {
        let repo = InMemoryAbilityRepository::new(MemoryDb::new());
        for name in ["Zoomies", "Hiss", "Pounce"] {
            repo.save(&test_ability(name, None)).await.unwrap();
        }

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(names, vec!["Hiss", "Pounce", "Zoomies"]);
    }

    #[tokio::test]
    async fn save_and_delete_keep_kitten_list_in_step() {
        let db = MemoryDb::new();
        let kitten = test_kitten();
        db.insert_kitten(kitten.clone()).await;
        let repo = InMemoryAbilityRepository::new(db.clone());
        let ability = test_ability("Pounce", Some(kitten.id));

        repo.save(&ability).await.unwrap();
        assert_eq!(db.read().await.kittens[&kitten.id].abilities, vec![ability.id]);

        assert!(repo.delete(&ability.id).await.unwrap());
        assert!(db.read().await.kittens[&kitten.id].abilities.is_empty());
        assert!(!repo.delete(&ability.id).await.unwrap());
    }

    #[tokio::test]
    async fn bind_claims_global_ability_once() {
        let db = MemoryDb::new();
        let (first, second) = (test_kitten(), test_kitten());
        db.insert_kitten(first.clone()).await;
        db.insert_kitten(second.clone()).await;
        let repo = InMemoryAbilityRepository::new(db.clone());
        let ability = repo.save(&test_ability("Pounce", None)).await.unwrap();

        let bound = repo.bind(&ability.id, &first.id).await.unwrap();
        assert_eq!(bound.kitten_id, Some(first.id));
        assert_eq!(db.read().await.kittens[&first.id].abilities, vec![ability.id]);

        // Rebinding to the same kitten is a no-op, to another is refused
        assert_eq!(repo.bind(&ability.id, &first.id).await.unwrap(), bound);
        assert!(matches!(
            repo.bind(&ability.id, &second.id).await,
            Err(DomainError::InvalidState(_))
        ));
        assert!(matches!(
            repo.bind(&AbilityId::new(), &first.id).await,
            Err(DomainError::AbilityNotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_binds_have_one_winner() {
        let db = MemoryDb::new();
        let kittens: Vec<_> = (0..8).map(|_| test_kitten()).collect();
        for kitten in &kittens {
            db.insert_kitten(kitten.clone()).await;
        }
        let repo = std::sync::Arc::new(InMemoryAbilityRepository::new(db.clone()));
        let ability = repo.save(&test_ability("Hiss", None)).await.unwrap();

        let mut handles = Vec::new();
        for kitten in &kittens {
            let repo = repo.clone();
            let (ability_id, kitten_id) = (ability.id, kitten.id);
            handles.push(tokio::spawn(async move { repo.bind(&ability_id, &kitten_id).await }));
        }
        let mut winners = Vec::new();
        for handle in handles {
            if let Ok(bound) = handle.await.unwrap() {
                winners.push(bound.kitten_id);
            }
        }

        assert_eq!(winners.len(), 1);
        let stored = repo.find_by_id(&ability.id).await.unwrap().unwrap();
        assert_eq!(stored.kitten_id, winners[0]);
        let tables = db.read().await;
        let holders = kittens
            .iter()
            .filter(|k| !tables.kittens[&k.id].abilities.is_empty())
            .count();
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn reassigning_moves_ability_between_kittens() {
        let db = MemoryDb::new();
        let (first, second) = (test_kitten(), test_kitten());
        db.insert_kitten(first.clone()).await;
        db.insert_kitten(second.clone()).await;
        let repo = InMemoryAbilityRepository::new(db.clone());
        let mut ability = test_ability("Hiss", Some(first.id));
        repo.save(&ability).await.unwrap();

        ability.kitten_id = Some(second.id);
        repo.save(&ability).await.unwrap();

        let tables = db.read().await;
        assert!(tables.kittens[&first.id].abilities.is_empty());
        assert_eq!(tables.kittens[&second.id].abilities, vec![ability.id]);
    }
}
