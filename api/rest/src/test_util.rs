use std::{path::PathBuf, sync::Arc};

use actix_web::{http::header, test::TestRequest, web};
use pf_config::app::AppConfigMode;
use pf_dao::{image::ImageStorage, Db};
use pf_db_sqlite::db::SqliteDb;
use tempfile::TempDir;

use crate::context::{ApiRestCtx, ApiRestDaoCtx};

const BOUNDARY: &str = "portfolio-test-boundary";

pub struct TestCtx {
    dir: TempDir,
    pub ctx: web::Data<ApiRestCtx>,
}

impl TestCtx {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let db_path = dir.path().join("projects.db");
        let db = SqliteDb::new(db_path.to_str().unwrap(), &1).await.unwrap();

        let image = ImageStorage::new(dir.path().join("uploads"));
        image.init().await.unwrap();

        let ctx = ApiRestCtx::new(
            &AppConfigMode::Development,
            ApiRestDaoCtx::new(Arc::new(Db::SqliteDb(db))),
            image,
        );

        Self {
            dir,
            ctx: web::Data::new(ctx),
        }
    }

    pub fn upload_root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn uploads(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read_upload(&self, file_name: &str) -> Vec<u8> {
        std::fs::read(self.upload_root().join(file_name)).unwrap()
    }
}

macro_rules! init_app {
    ($tc:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(
                    actix_web::middleware::ErrorHandlers::new()
                        .default_handler(crate::error_handler::default_error_handler),
                )
                .app_data($tc.ctx.clone())
                .configure(crate::configure::configure),
        )
        .await
    };
}

pub(crate) use init_app;

pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\nContent-Type: text/plain\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, req: TestRequest) -> TestRequest {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        req.insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(self.body)
    }
}
