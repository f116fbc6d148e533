use actix_multipart::form::MultipartForm;
use actix_web::{http::StatusCode, web, HttpResponse};
use pf_dao::project::ProjectDao;
use pf_error::Error;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        project::{
            DeleteOneProjectReqPath, FindOneProjectReqPath, InsertOneProjectReqForm,
            ProjectResJson, UpdateOneProjectReqForm, UpdateOneProjectReqPath,
        },
        MessageRes, Response,
    },
};

pub fn project_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects", web::get().to(find_many))
        .route("/projects", web::post().to(insert_one))
        .route("/projects/{project_id}", web::get().to(find_one))
        .route("/projects/{project_id}", web::put().to(update_one))
        .route("/projects/{project_id}", web::delete().to(delete_one));
}

async fn find_many(ctx: web::Data<ApiRestCtx>) -> HttpResponse {
    let projects_data = match ProjectDao::db_select_many(ctx.dao().db()).await {
        Ok(data) => data,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    let mut projects_res = Vec::with_capacity(projects_data.len());
    for project_data in &projects_data {
        projects_res.push(ProjectResJson::new(
            project_data.id(),
            project_data.title(),
            project_data.description(),
            project_data.image_url(),
        ));
    }

    Response::data(&StatusCode::OK, &projects_res)
}

async fn find_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<FindOneProjectReqPath>,
) -> HttpResponse {
    let project_data = match ProjectDao::db_select(ctx.dao().db(), path.project_id()).await {
        Ok(data) => data,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    Response::data(
        &StatusCode::OK,
        &ProjectResJson::new(
            project_data.id(),
            project_data.title(),
            project_data.description(),
            project_data.image_url(),
        ),
    )
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    form: MultipartForm<InsertOneProjectReqForm>,
) -> HttpResponse {
    let fields = form.fields();
    if let Err(err) = fields.validate() {
        return Response::error(ctx.mode(), &Error::Validation(err.to_string()));
    }

    let upload = match form.image() {
        Ok(upload) => upload,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    // The record goes in first so the image can be named after its id.
    let mut project_data = match ProjectDao::db_insert(
        ctx.dao().db(),
        fields.title(),
        fields.description(),
        &None,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    let image_url = match ctx
        .image()
        .attach_on_create(project_data.id(), upload.as_ref())
        .await
    {
        Ok(image_url) => image_url,
        Err(err) => {
            discard_project(&ctx, &project_data).await;
            return Response::error(ctx.mode(), &err);
        }
    };

    if image_url.is_some() {
        project_data.set_image_url(&image_url);
        if let Err(err) = project_data.db_update(ctx.dao().db()).await {
            discard_project(&ctx, &project_data).await;
            return Response::error(ctx.mode(), &err);
        }
    }

    pf_log::info(
        None,
        format!("[Project] Created project {}", project_data.id()),
    );

    Response::data(
        &StatusCode::CREATED,
        &ProjectResJson::new(
            project_data.id(),
            project_data.title(),
            project_data.description(),
            project_data.image_url(),
        ),
    )
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<UpdateOneProjectReqPath>,
    form: MultipartForm<UpdateOneProjectReqForm>,
) -> HttpResponse {
    let mut project_data = match ProjectDao::db_select(ctx.dao().db(), path.project_id()).await {
        Ok(data) => data,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    let fields = form.fields();
    if let Err(err) = fields.validate() {
        return Response::error(ctx.mode(), &Error::Validation(err.to_string()));
    }

    let upload = match form.image() {
        Ok(upload) => upload,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    let image_change = match ctx
        .image()
        .reconcile(&project_data, &form.delete_image(), upload.as_ref())
        .await
    {
        Ok(change) => change,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    project_data.set_title(fields.title());
    project_data.set_description(fields.description());
    project_data.set_image_url(image_change.image_url());

    if let Err(err) = project_data.db_update(ctx.dao().db()).await {
        if let Err(revert_err) = image_change.revert(ctx.image()).await {
            pf_log::warn(
                None,
                format!(
                    "[Project] Failed to drop unused image of project {}: {revert_err}",
                    project_data.id()
                ),
            );
        }
        return Response::error(ctx.mode(), &err);
    }

    // Record is committed; a leftover file is the lesser evil from here on.
    if let Err(err) = image_change.reclaim(ctx.image()).await {
        pf_log::warn(
            None,
            format!(
                "[Project] Superseded image of project {} left on disk: {err}",
                project_data.id()
            ),
        );
    }

    Response::data(
        &StatusCode::OK,
        &ProjectResJson::new(
            project_data.id(),
            project_data.title(),
            project_data.description(),
            project_data.image_url(),
        ),
    )
}

async fn delete_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<DeleteOneProjectReqPath>,
) -> HttpResponse {
    let project_data = match ProjectDao::db_select(ctx.dao().db(), path.project_id()).await {
        Ok(data) => data,
        Err(err) => return Response::error(ctx.mode(), &err),
    };

    if let Err(err) = ProjectDao::db_delete(ctx.dao().db(), project_data.id()).await {
        return Response::error(ctx.mode(), &err);
    }

    if let Err(err) = ctx.image().delete_for_project(&project_data).await {
        pf_log::warn(
            None,
            format!(
                "[Project] Image of deleted project {} left on disk: {err}",
                project_data.id()
            ),
        );
    }

    pf_log::info(
        None,
        format!("[Project] Deleted project {}", project_data.id()),
    );

    Response::data(&StatusCode::OK, &MessageRes::new("Project deleted"))
}

async fn discard_project(ctx: &ApiRestCtx, project_data: &ProjectDao) {
    if let Err(err) = ctx.image().delete_for_project(project_data).await {
        pf_log::warn(
            None,
            format!(
                "[Project] Failed to drop image of project {}: {err}",
                project_data.id()
            ),
        );
    }
    if let Err(err) = ProjectDao::db_delete(ctx.dao().db(), project_data.id()).await {
        pf_log::error(
            None,
            format!(
                "[Project] Failed to roll back project {}: {err}",
                project_data.id()
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_util::{init_app, MultipartBody, TestCtx};

    #[actix_web::test]
    async fn create_then_list() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Portfolio")
            .text("description", "A site")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        assert_eq!(
            created,
            json!({"id": 1, "title": "Portfolio", "description": "A site", "image_url": null})
        );

        let res = test::call_service(&app, test::TestRequest::get().uri("/projects").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let listed: Value = test::read_body_json(res).await;
        assert_eq!(listed, json!([created]));
    }

    #[actix_web::test]
    async fn create_with_image_stores_file_under_project_id() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"png-bytes")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;

        assert_eq!(created["description"], Value::Null);
        assert_eq!(created["image_url"], "static/uploads/1_cover.png");
        assert_eq!(tc.read_upload("1_cover.png"), b"png-bytes");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/projects/1").to_request(),
        )
        .await;
        let fetched: Value = test::read_body_json(res).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn create_with_long_file_name_is_stored() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let file_name = format!("{}.png", "фото".repeat(35));
        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", &file_name, "image/png", b"png-bytes")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let uploads = tc.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].starts_with("1_фото"));
        assert!(uploads[0].ends_with(".png"));
        assert!(uploads[0].len() < 255);
    }

    #[actix_web::test]
    async fn create_rolls_back_record_when_image_write_fails() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);
        std::fs::remove_dir_all(tc.upload_root()).unwrap();

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"png-bytes")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/projects").to_request(),
        )
        .await;
        let listed: Value = test::read_body_json(res).await;
        assert_eq!(listed, json!([]));
    }

    #[actix_web::test]
    async fn update_keeps_record_when_image_write_fails() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .text("description", "Before")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        let created: Value = test::read_body_json(res).await;
        std::fs::remove_dir_all(tc.upload_root()).unwrap();

        let req = MultipartBody::new()
            .text("title", "Gallery v2")
            .text("description", "After")
            .file("image", "cover.png", "image/png", b"png-bytes")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/projects/1").to_request(),
        )
        .await;
        let fetched: Value = test::read_body_json(res).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn create_rejects_blank_title() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "   ")
            .file("image", "cover.png", "image/png", b"png-bytes")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());

        let req = MultipartBody::new()
            .text("description", "no title at all")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        assert!(tc.uploads().is_empty());
        let res = test::call_service(&app, test::TestRequest::get().uri("/projects").to_request()).await;
        let listed: Value = test::read_body_json(res).await;
        assert_eq!(listed, json!([]));
    }

    #[actix_web::test]
    async fn create_rejects_non_image_upload() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Docs")
            .file("image", "notes.txt", "text/plain", b"hello")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(tc.uploads().is_empty());
    }

    #[actix_web::test]
    async fn empty_file_part_counts_as_no_image() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Plain")
            .file("image", "", "application/octet-stream", b"")
            .into_request(test::TestRequest::post().uri("/projects"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        assert_eq!(created["image_url"], Value::Null);
        assert!(tc.uploads().is_empty());
    }

    #[actix_web::test]
    async fn update_without_image_changes_keeps_image_url() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"png-bytes")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let req = MultipartBody::new()
            .text("title", "Gallery v2")
            .text("description", "")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;
        assert_eq!(
            updated,
            json!({
                "id": 1,
                "title": "Gallery v2",
                "description": "",
                "image_url": "static/uploads/1_cover.png"
            })
        );
        assert_eq!(tc.uploads(), vec!["1_cover.png"]);
    }

    #[actix_web::test]
    async fn update_with_new_image_replaces_old_file() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"old")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .text("description", "new cover")
            .file("image", "banner.jpg", "image/jpeg", b"new")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;

        assert_eq!(updated["image_url"], "static/uploads/1_banner.jpg");
        assert_eq!(tc.uploads(), vec!["1_banner.jpg"]);
        assert_eq!(tc.read_upload("1_banner.jpg"), b"new");
    }

    #[actix_web::test]
    async fn delete_image_flag_wins_over_new_upload() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"old")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .text("description", "bare")
            .text("deleteImage", "true")
            .file("image", "banner.jpg", "image/jpeg", b"new")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;

        assert_eq!(updated["image_url"], Value::Null);
        assert!(tc.uploads().is_empty());
    }

    #[actix_web::test]
    async fn delete_image_flag_on_project_without_image() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Portfolio")
            .text("description", "A site")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let req = MultipartBody::new()
            .text("title", "Portfolio v2")
            .text("description", "A site v2")
            .text("deleteImage", "true")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;

        assert_eq!(
            updated,
            json!({"id": 1, "title": "Portfolio v2", "description": "A site v2", "image_url": null})
        );
        assert!(tc.uploads().is_empty());
    }

    #[actix_web::test]
    async fn update_unknown_project_is_not_found() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Ghost")
            .file("image", "ghost.png", "image/png", b"boo")
            .into_request(test::TestRequest::put().uri("/projects/41"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
        assert!(tc.uploads().is_empty());
    }

    #[actix_web::test]
    async fn update_rejects_blank_title_and_keeps_record() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Keep me")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let req = MultipartBody::new()
            .text("title", "")
            .file("image", "cover.png", "image/png", b"png")
            .into_request(test::TestRequest::put().uri("/projects/1"));
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(tc.uploads().is_empty());

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/projects/1").to_request(),
        )
        .await;
        let fetched: Value = test::read_body_json(res).await;
        assert_eq!(fetched["title"], "Keep me");
    }

    #[actix_web::test]
    async fn delete_removes_record_and_image() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"old")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/projects/1").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert!(body["message"].is_string());
        assert!(tc.uploads().is_empty());

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/projects/1").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn delete_unknown_project_leaves_files_alone() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"old")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/projects/2").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(tc.uploads(), vec!["1_cover.png"]);
    }

    #[actix_web::test]
    async fn delete_tolerates_already_missing_image() {
        let tc = TestCtx::new().await;
        let app = init_app!(tc);

        let req = MultipartBody::new()
            .text("title", "Gallery")
            .file("image", "cover.png", "image/png", b"old")
            .into_request(test::TestRequest::post().uri("/projects"));
        test::call_service(&app, req.to_request()).await;
        std::fs::remove_file(tc.upload_root().join("1_cover.png")).unwrap();

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/projects/1").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
