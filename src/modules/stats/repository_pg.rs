use uuid::Uuid;

use crate::{
    api::error,
    modules::stats::{model::SaveStatsModel, repository::StatsRepository, schema::StatsEntity},
};

#[derive(Clone)]
pub struct StatsRepositoryPg {
    pool: sqlx::PgPool,
}

impl StatsRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StatsRepository for StatsRepositoryPg {
    async fn find_by_user_ids(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<StatsEntity>, error::SystemError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let stats = sqlx::query_as::<_, StatsEntity>(
            "SELECT * FROM stats WHERE user_id = ANY($1) ORDER BY best_score DESC",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn upsert(
        &self,
        user_id: &Uuid,
        stats: &SaveStatsModel,
    ) -> Result<StatsEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let stats = sqlx::query_as::<_, StatsEntity>(
            r#"
            INSERT INTO stats (id, user_id, games_played, games_won, best_score)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET
                games_played = EXCLUDED.games_played,
                games_won    = EXCLUDED.games_won,
                best_score   = EXCLUDED.best_score,
                updated_at   = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(stats.games_played)
        .bind(stats.games_won)
        .bind(stats.best_score)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
