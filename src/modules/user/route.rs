use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

use crate::{constants::ROLE_ADMIN, middlewares::authorization, modules::user::handle::*};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(create_account).service(login).service(refresh_token);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(list_users).service(
        scope("/role")
            .wrap(from_fn(authorization(vec![ROLE_ADMIN])))
            .service(save_role)
            .service(add_role_to_user),
    );
}
