use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(send_friend_request)
            .service(send_friend_request_detailed)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(get_incoming_requests)
            .service(get_outgoing_requests)
            .service(get_friends)
            .service(get_friends_stats),
    );
}
