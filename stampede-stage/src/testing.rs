//! Mock repository for unit tests

use async_trait::async_trait;
use mockall::mock;

use stampede_interfaces::{
    PoolStatsSnapshot, QueryFailure, QueryOutcome, QueryRequest, Repository, RepositoryError,
    SyntheticRecord, ValidIdentifiers,
};

mock! {
    pub Repo {}

    #[async_trait]
    impl Repository for Repo {
        async fn query(&self, request: QueryRequest) -> Result<QueryOutcome, QueryFailure>;
        async fn insert(&self, records: Vec<SyntheticRecord>) -> Result<(), RepositoryError>;
        async fn count(&self) -> Result<u64, RepositoryError>;
        async fn clear(&self) -> Result<(), RepositoryError>;
        fn set_valid_identifiers(&self, identifiers: ValidIdentifiers);
        async fn close(&self) -> Result<(), RepositoryError>;
        fn pool_stats(&self) -> Option<PoolStatsSnapshot>;
        fn backend_name(&self) -> &'static str;
    }
}
