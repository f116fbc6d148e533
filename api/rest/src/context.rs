use std::sync::Arc;

use pf_config::app::AppConfigMode;
use pf_dao::{image::ImageStorage, Db};

pub struct ApiRestCtx {
    mode: AppConfigMode,
    dao: ApiRestDaoCtx,
    image: ImageStorage,
}

impl ApiRestCtx {
    pub fn new(mode: &AppConfigMode, dao: ApiRestDaoCtx, image: ImageStorage) -> Self {
        Self {
            mode: *mode,
            dao,
            image,
        }
    }

    pub fn mode(&self) -> &AppConfigMode {
        &self.mode
    }

    pub fn dao(&self) -> &ApiRestDaoCtx {
        &self.dao
    }

    pub fn image(&self) -> &ImageStorage {
        &self.image
    }
}

pub struct ApiRestDaoCtx {
    db: Arc<Db>,
}

impl ApiRestDaoCtx {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }
}
