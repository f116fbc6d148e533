use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use pf_config::app::AppConfigMode;
use pf_error::Error;
use serde::Serialize;

pub mod project;
pub mod upload;

pub struct Response;

impl Response {
    pub fn data<T: Serialize>(status_code: &StatusCode, data: T) -> HttpResponse {
        match serde_json::to_value(data) {
            Ok(data) => HttpResponseBuilder::new(*status_code).json(data),
            Err(err) => {
                pf_log::error(None, &err);
                Self::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        }
    }

    pub fn error(mode: &AppConfigMode, err: &Error) -> HttpResponse {
        match err {
            Error::Validation(msg) => Self::error_raw(&StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => Self::error_raw(&StatusCode::NOT_FOUND, msg),
            Error::Storage(_) | Error::Filesystem(_) => {
                pf_log::error(None, err);
                let message = match mode {
                    AppConfigMode::Development => err.to_string(),
                    AppConfigMode::Production => "Internal server error".to_owned(),
                };
                Self::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &message)
            }
        }
    }

    pub fn error_raw(status_code: &StatusCode, message: &str) -> HttpResponse {
        if status_code.is_client_error() {
            pf_log::debug(None, format!("{status_code}: {message}"));
        }

        HttpResponseBuilder::new(*status_code).json(ErrorRes {
            error: message.to_owned(),
        })
    }
}

#[derive(Serialize)]
pub struct ErrorRes {
    error: String,
}

#[derive(Serialize)]
pub struct MessageRes {
    message: String,
}

impl MessageRes {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}
