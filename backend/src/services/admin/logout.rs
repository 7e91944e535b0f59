use crate::auth::{session, AdminSession};
use actix_web::http::header;
use actix_web::{HttpResponse, Responder};

pub async fn process(_session: AdminSession) -> impl Responder {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/admin/login"))
        .cookie(session::removal_cookie())
        .finish()
}
