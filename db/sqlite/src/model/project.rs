use sqlx::prelude::FromRow;

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    id: i64,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl ProjectModel {
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

    pub fn id(&self) -> &i64 {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &Option<String> {
        &self.description
    }

    pub fn image_url(&self) -> &Option<String> {
        &self.image_url
    }
}
