use std::sync::Arc;

use pf_api_rest::{
    context::{ApiRestCtx, ApiRestDaoCtx},
    ApiRestServer,
};
use pf_dao::{image::ImageStorage, Db};
use pf_db_sqlite::db::SqliteDb;

mod config_path;

#[tokio::main]
async fn main() {
    let config_path = config_path::get();
    let config = match pf_config::from_path(&config_path) {
        Ok(config) => config,
        Err(err) => pf_log::panic(None, format!("[Portfolio] {err:#}")),
    };

    if let Err(err) = pf_log::init(config.log().display_level(), config.log().level_filter()) {
        pf_log::panic(None, format!("[Portfolio] Initializing log failed: {err}"));
    }

    pf_log::info(Some("🚀"), "[Portfolio] Starting");

    let db = match SqliteDb::new(
        config.db().sqlite().path(),
        config.db().sqlite().max_connections(),
    )
    .await
    {
        Ok(db) => Arc::new(Db::SqliteDb(db)),
        Err(err) => pf_log::panic(
            None,
            format!("[Portfolio] Initializing database failed: {err:#}"),
        ),
    };

    let image_storage = ImageStorage::new(config.upload().path());
    if let Err(err) = image_storage.init().await {
        pf_log::panic(
            None,
            format!("[Portfolio] Initializing upload directory failed: {err}"),
        );
    }

    let api_rest_server = ApiRestServer::new(
        config.api().rest().host(),
        config.api().rest().port(),
        config.api().rest().allowed_origin(),
        ApiRestCtx::new(
            config.app().mode(),
            ApiRestDaoCtx::new(db.clone()),
            image_storage,
        ),
    );

    match api_rest_server.run().await {
        Ok(_) => pf_log::info(Some("👋"), "[Portfolio] Turned off"),
        Err(err) => pf_log::error(None, format!("[Portfolio] {err:#}")),
    }

    db.close().await;
}
