use actix_web::{
    cookie::{time, Cookie},
    get, post, web, HttpRequest,
};

use crate::constants::REFRESH_TOKEN_COOKIE;
use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    utils::ValidatedJson,
    ENV,
};

#[post("/createAccount")]
pub async fn create_account(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::CreateAccountModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user =
        user_service.create_account(user_data.0).await.map_err(error::Error::unprocessable_from)?;
    Ok(success::Success::created(Some(user)).message("Account created successfully"))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::TokenResponse>, error::Error> {
    let tokens = user_service.sign_in(user_data.0).await?;
    let refresh_cookie = refresh_cookie(tokens.refresh_token.clone());

    Ok(success::Success::ok(Some(tokens))
        .message("Signin successful")
        .cookies(vec![refresh_cookie]))
}

#[get("/refreshToken")]
pub async fn refresh_token(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::TokenResponse>, error::Error> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);
    let refresh_token = bearer.or_else(|| req.cookie(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()));

    let tokens = user_service.refresh(refresh_token).await?;
    Ok(success::Success::ok(Some(tokens)).message("Refresh successful"))
}

#[get("/users")]
pub async fn list_users(
    user_service: web::Data<UserService>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.get_users().await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[post("/save")]
pub async fn save_role(
    user_service: web::Data<UserService>,
    role: ValidatedJson<model::RoleModel>,
) -> Result<success::Success<model::RoleResponse>, error::Error> {
    let role = user_service.save_role(role.0).await?;
    Ok(success::Success::created(Some(role)).message("Role saved successfully"))
}

#[post("/addToUser")]
pub async fn add_role_to_user(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::AddRoleToUserModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.add_role_to_user(body.0).await?;
    Ok(success::Success::ok(None).message("Role added to user"))
}

fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ENV.refresh_token_expiration as i64))
        .finish()
}
