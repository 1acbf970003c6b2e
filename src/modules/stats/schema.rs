use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct StatsEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub games_played: i32,
    pub games_won: i32,
    pub best_score: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
