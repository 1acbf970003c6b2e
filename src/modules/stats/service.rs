use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        stats::{
            model::{SaveStatsModel, StatsResponse},
            repository::StatsRepository,
        },
        user::{model::UserResponse, repository::UserRepository},
    },
};

#[derive(Clone)]
pub struct StatsService {
    stats_repo: Arc<dyn StatsRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl StatsService {
    pub fn with_dependencies(
        stats_repo: Arc<dyn StatsRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        info!("StatsService initialized with dependencies");
        StatsService { stats_repo, user_repo }
    }

    pub async fn save_stats(
        &self,
        user_id: Uuid,
        stats: SaveStatsModel,
    ) -> Result<StatsResponse, error::SystemError> {
        if stats.games_won > stats.games_played {
            return Err(error::SystemError::bad_request(
                "Games won cannot exceed games played",
            ));
        }

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let entity = self.stats_repo.upsert(&user_id, &stats).await?;
        info!("Stats saved for {}", user.username);
        Ok(StatsResponse::new(entity, UserResponse::from(user)))
    }
}
