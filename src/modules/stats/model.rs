use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{stats::schema::StatsEntity, user::model::UserResponse};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveStatsModel {
    #[validate(range(min = 0, message = "Games played cannot be negative"))]
    pub games_played: i32,
    #[validate(range(min = 0, message = "Games won cannot be negative"))]
    pub games_won: i32,
    #[validate(range(min = 0, message = "Best score cannot be negative"))]
    pub best_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub id: Uuid,
    pub user: UserResponse,
    pub games_played: i32,
    pub games_won: i32,
    pub best_score: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StatsResponse {
    pub fn new(entity: StatsEntity, user: UserResponse) -> Self {
        StatsResponse {
            id: entity.id,
            user,
            games_played: entity.games_played,
            games_won: entity.games_won,
            best_score: entity.best_score,
            updated_at: entity.updated_at,
        }
    }
}
