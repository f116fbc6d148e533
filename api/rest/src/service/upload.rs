use std::io;

use actix_files::NamedFile;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use pf_error::Error;

use crate::{
    context::ApiRestCtx,
    model::{upload::FindOneUploadReqPath, Response},
};

pub fn upload_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/static/uploads/{file_name}", web::get().to(find_one));
}

async fn find_one(
    ctx: web::Data<ApiRestCtx>,
    req: HttpRequest,
    path: web::Path<FindOneUploadReqPath>,
) -> HttpResponse {
    let Some(file_path) = ctx.image().resolve_file_name(path.file_name()) else {
        return Response::error_raw(&StatusCode::NOT_FOUND, "File not found");
    };

    match NamedFile::open_async(&file_path).await {
        Ok(file) => file.into_response(&req),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Response::error_raw(&StatusCode::NOT_FOUND, "File not found")
        }
        Err(err) => Response::error(ctx.mode(), &Error::Filesystem(err)),
    }
}
