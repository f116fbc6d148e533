use std::borrow::Cow;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use pf_dao::image::ImageUpload;
use pf_error::Error;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Deserialize)]
pub struct FindOneProjectReqPath {
    project_id: i64,
}

impl FindOneProjectReqPath {
    pub fn project_id(&self) -> &i64 {
        &self.project_id
    }
}

#[derive(MultipartForm)]
pub struct InsertOneProjectReqForm {
    title: Option<Text<String>>,
    description: Option<Text<String>>,
    image: Option<TempFile>,
}

impl InsertOneProjectReqForm {
    pub fn fields(&self) -> ProjectFields {
        ProjectFields::new(&self.title, &self.description)
    }

    pub fn image(&self) -> Result<Option<ImageUpload>, Error> {
        image_upload(&self.image)
    }
}

#[derive(Deserialize)]
pub struct UpdateOneProjectReqPath {
    project_id: i64,
}

impl UpdateOneProjectReqPath {
    pub fn project_id(&self) -> &i64 {
        &self.project_id
    }
}

#[derive(MultipartForm)]
pub struct UpdateOneProjectReqForm {
    title: Option<Text<String>>,
    description: Option<Text<String>>,
    image: Option<TempFile>,
    #[multipart(rename = "deleteImage")]
    delete_image: Option<Text<String>>,
}

impl UpdateOneProjectReqForm {
    pub fn fields(&self) -> ProjectFields {
        ProjectFields::new(&self.title, &self.description)
    }

    pub fn image(&self) -> Result<Option<ImageUpload>, Error> {
        image_upload(&self.image)
    }

    pub fn delete_image(&self) -> bool {
        self.delete_image
            .as_ref()
            .is_some_and(|flag| flag.0.trim().eq_ignore_ascii_case("true"))
    }
}

#[derive(Deserialize)]
pub struct DeleteOneProjectReqPath {
    project_id: i64,
}

impl DeleteOneProjectReqPath {
    pub fn project_id(&self) -> &i64 {
        &self.project_id
    }
}

#[derive(Validate)]
pub struct ProjectFields {
    #[validate(custom(function = "not_blank"))]
    title: String,
    description: Option<String>,
}

impl ProjectFields {
    fn new(title: &Option<Text<String>>, description: &Option<Text<String>>) -> Self {
        Self {
            title: title.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
            description: description.as_ref().map(|d| d.0.clone()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &Option<String> {
        &self.description
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("Title must not be empty"));
        return Err(err);
    }
    Ok(())
}

fn image_upload(image: &Option<TempFile>) -> Result<Option<ImageUpload>, Error> {
    let Some(image) = image else {
        return Ok(None);
    };

    // untouched file inputs arrive as an empty, nameless part
    if image.size == 0 && image.file_name.as_deref().map_or(true, str::is_empty) {
        return Ok(None);
    }

    if let Some(content_type) = &image.content_type {
        if content_type.type_() != mime::IMAGE {
            return Err(Error::Validation(format!(
                "Image must have an image/* content type, got {content_type}"
            )));
        }
    }

    Ok(Some(ImageUpload::new(image.file.path(), &image.file_name)))
}

#[derive(Serialize)]
pub struct ProjectResJson {
    id: i64,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl ProjectResJson {
    pub fn new(
        id: &i64,
        title: &str,
        description: &Option<String>,
        image_url: &Option<String>,
    ) -> Self {
        Self {
            id: *id,
            title: title.to_owned(),
            description: description.clone(),
            image_url: image_url.clone(),
        }
    }
}
