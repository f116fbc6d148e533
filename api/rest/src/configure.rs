use actix_web::web;

use crate::service::{project::project_api, root::root_api, upload::upload_api};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(root_api)
        .configure(project_api)
        .configure(upload_api);
}
