use uuid::Uuid;

use crate::{
    api::error,
    modules::stats::{model::SaveStatsModel, schema::StatsEntity},
};

#[async_trait::async_trait]
pub trait StatsRepository {
    async fn find_by_user_ids(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<StatsEntity>, error::SystemError>;

    /// Replaces the user's snapshot, creating it on first save.
    async fn upsert(
        &self,
        user_id: &Uuid,
        stats: &SaveStatsModel,
    ) -> Result<StatsEntity, error::SystemError>;
}
