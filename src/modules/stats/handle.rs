use actix_web::{post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::stats::{model, service::StatsService},
    utils::ValidatedJson,
};

#[post("/save")]
pub async fn save_stats(
    stats_service: web::Data<StatsService>,
    body: ValidatedJson<model::SaveStatsModel>,
    req: HttpRequest,
) -> Result<success::Success<model::StatsResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let stats = stats_service
        .save_stats(user_id, body.0)
        .await
        .map_err(error::Error::unprocessable_from)?;
    Ok(success::Success::ok(Some(stats)).message("Stats saved successfully"))
}
