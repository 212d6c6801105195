//! Baseline dataset for a stage

use std::collections::HashSet;
use tracing::{debug, info};

use stampede_interfaces::{Repository, SyntheticRecord, ValidIdentifiers};

use crate::error::StageError;
use crate::generator::{generate_identifier, generate_payload};

/// Replace the collection contents with `collection_size` fresh documents
///
/// An existing collection is cleared first, so reseeding never appends. All
/// documents go in with one bulk insert. The returned identifiers are in
/// generation order and pairwise distinct.
pub async fn seed(
    repository: &dyn Repository,
    collection_size: u32,
    document_size_kb: u32,
) -> Result<ValidIdentifiers, StageError> {
    let existing = repository.count().await.map_err(StageError::Seed)?;
    if existing > 0 {
        info!(existing, "Clearing existing documents");
        repository.clear().await.map_err(StageError::Seed)?;
    }

    let size = collection_size as usize;
    let mut seen = HashSet::with_capacity(size);
    let mut identifiers = Vec::with_capacity(size);
    let mut records = Vec::with_capacity(size);

    for index in 0..size {
        let mut id = generate_identifier();
        while !seen.insert(id.clone()) {
            id = generate_identifier();
        }

        records.push(SyntheticRecord::new(
            id.clone(),
            format!("name: {}", index),
            generate_payload(document_size_kb),
        ));
        identifiers.push(id);
        debug!("Added document {} of {}", index + 1, size);
    }

    repository.insert(records).await.map_err(StageError::Seed)?;
    info!(
        documents = size,
        document_size_kb, "Collection seeded"
    );

    Ok(ValidIdentifiers::new(identifiers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{CHARSET, IDENTIFIER_LENGTH};
    use crate::testing::MockRepo;
    use mockall::predicate::always;
    use mockall::Sequence;
    use stampede_interfaces::RepositoryError;
    use stampede_storage::InMemoryRepository;

    #[tokio::test]
    async fn seeds_distinct_identifiers_in_order() {
        let repo = InMemoryRepository::new();
        let ids = seed(&repo, 50, 1).await.unwrap();

        assert_eq!(ids.len(), 50);
        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), 50);
        assert!(ids
            .iter()
            .all(|id| id.len() == IDENTIFIER_LENGTH && id.bytes().all(|b| CHARSET.contains(&b))));

        let stored = repo.records();
        assert_eq!(stored.len(), 50);
        for (index, (record, id)) in stored.iter().zip(ids.iter()).enumerate() {
            assert_eq!(&record.id, id);
            assert_eq!(record.name, format!("name: {}", index));
            assert_eq!(record.payload.len(), 1024);
        }
    }

    #[tokio::test]
    async fn reseeding_replaces_previous_documents() {
        let repo = InMemoryRepository::new();
        let first = seed(&repo, 10, 0).await.unwrap();
        let second = seed(&repo, 4, 0).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 4);
        assert!(second.iter().all(|id| !first.contains(id)));
    }

    #[tokio::test]
    async fn empty_collection_is_not_cleared() {
        let mut repo = MockRepo::new();
        let mut seq = Sequence::new();
        repo.expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(0));
        repo.expect_clear().never();
        repo.expect_insert()
            .with(always())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|records| {
                assert_eq!(records.len(), 3);
                Ok(())
            });

        assert_eq!(seed(&repo, 3, 0).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn count_failure_aborts_before_writing() {
        let mut repo = MockRepo::new();
        repo.expect_count()
            .returning(|| Err(RepositoryError::connection("refused")));
        repo.expect_clear().never();
        repo.expect_insert().never();

        let err = seed(&repo, 3, 0).await.unwrap_err();
        assert!(matches!(err, StageError::Seed(RepositoryError::Connection { .. })));
    }

    #[tokio::test]
    async fn clear_failure_is_propagated() {
        let mut repo = MockRepo::new();
        repo.expect_count().returning(|| Ok(7));
        repo.expect_clear()
            .times(1)
            .returning(|| Err(RepositoryError::write("drop failed")));
        repo.expect_insert().never();

        let err = seed(&repo, 3, 0).await.unwrap_err();
        assert_eq!(err.to_string(), "Seeding failed: Write failed: drop failed");
    }

    #[tokio::test]
    async fn insert_failure_is_propagated() {
        let mut repo = MockRepo::new();
        repo.expect_count().returning(|| Ok(0));
        repo.expect_insert()
            .returning(|_| Err(RepositoryError::write("duplicate record_id")));

        assert!(matches!(seed(&repo, 1, 0).await, Err(StageError::Seed(_))));
    }
}
