use actix_cors::Cors;
use actix_web::{
    http::{Method, Uri},
    middleware::{ErrorHandlers, Logger},
    web, App, HttpServer,
};
use anyhow::{bail, Context, Result};
use configure::configure;
use context::ApiRestCtx;
use error_handler::default_error_handler;
use logger::logger_format;

mod configure;
pub mod context;
mod error_handler;
mod logger;
mod model;
mod service;

#[cfg(test)]
mod test_util;

pub struct ApiRestServer {
    address: String,
    allowed_origin: Option<String>,
    context: web::Data<ApiRestCtx>,
}

impl ApiRestServer {
    pub fn new(host: &str, port: &u16, allowed_origin: &Option<String>, ctx: ApiRestCtx) -> Self {
        pf_log::info(Some("⚡"), "[ApiRestServer] Initializing component");

        let address = format!("{host}:{port}");
        let context = web::Data::new(ctx);

        Self {
            address,
            allowed_origin: allowed_origin.clone(),
            context,
        }
    }

    pub async fn run(self) -> Result<()> {
        check_allowed_origin(&self.allowed_origin)?;

        pf_log::info(
            Some("💫"),
            format!("[ApiRestServer] Listening on {}", self.address),
        );

        let allowed_origin = self.allowed_origin;
        let context = self.context;

        Ok(HttpServer::new(move || {
            App::new()
                .wrap(ErrorHandlers::new().default_handler(default_error_handler))
                .wrap(Logger::new(logger_format()))
                .wrap(cors(&allowed_origin))
                .app_data(context.clone())
                .configure(configure)
        })
        .bind(self.address)?
        .run()
        .await?)
    }
}

// actix-cors panics in every worker on an origin it cannot use, so a bad
// value has to be caught before the server starts
fn check_allowed_origin(allowed_origin: &Option<String>) -> Result<()> {
    let Some(origin) = allowed_origin.as_deref().map(str::trim) else {
        return Ok(());
    };
    if origin == "*" {
        return Ok(());
    }

    let uri: Uri = origin
        .parse()
        .with_context(|| format!("Invalid allowed_origin '{origin}'"))?;
    if uri.scheme().is_none() || uri.host().is_none() {
        bail!("Invalid allowed_origin '{origin}': expected scheme and host, e.g. http://localhost:3000");
    }

    Ok(())
}

fn cors(allowed_origin: &Option<String>) -> Cors {
    let cors = match allowed_origin.as_deref().map(str::trim) {
        Some(origin) if origin != "*" => Cors::default().allowed_origin(origin),
        _ => Cors::default().allow_any_origin(),
    };

    cors.allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_any_header()
        .max_age(3600)
}
