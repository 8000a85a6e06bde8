use actix_web::web;
use crate::server::controller::orders::list_orders;
use crate::server::database::pool::DbClient;

pub(crate) fn configure<M: DbClient>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/orders").route(web::get().to(list_orders::<M>)));
}
