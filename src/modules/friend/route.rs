use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(list_friend_requests)
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(delete_friend_request)
            .service(list_friends)
            .service(list_friend_ids)
            .service(remove_friend),
    )
    .service(
        scope("/blocks").service(list_blocked_users).service(block_user).service(unblock_user),
    );
}
