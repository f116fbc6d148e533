use std::error::Error as StdError;

use actix_web::{
    body::{to_bytes, MessageBody},
    dev::ServiceResponse,
    http::header,
    middleware::ErrorHandlerResponse,
    Result,
};
use futures::executor;

use crate::model::Response;

pub fn default_error_handler<B: MessageBody>(
    svc_res: ServiceResponse<B>,
) -> Result<ErrorHandlerResponse<B>> {
    if let Some(content_type) = svc_res.response().headers().get(header::CONTENT_TYPE) {
        if let Ok(content_type) = content_type.to_str() {
            if content_type
                .to_lowercase()
                .starts_with(mime::APPLICATION_JSON.essence_str())
            {
                return Ok(ErrorHandlerResponse::Response(svc_res.map_into_left_body()));
            }
        }
    }

    let (req, res) = svc_res.into_parts();

    let status_code = res.status();
    let body = executor::block_on(async {
        match to_bytes(res.into_body()).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                let err: Box<dyn StdError> = err.into();
                err.to_string()
            }
        }
    });

    let message = match body.trim() {
        "" => status_code
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_owned(),
        body => body.to_owned(),
    };

    let res = Response::error_raw(&status_code, &message);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res).map_into_right_body(),
    ))
}
