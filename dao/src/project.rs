use pf_db_sqlite::model::project::ProjectModel as ProjectSqliteModel;
use pf_error::{Error, Result};

use crate::Db;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDao {
    id: i64,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl ProjectDao {
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

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    pub fn set_description(&mut self, description: &Option<String>) {
        self.description = description.clone();
    }

    pub fn set_image_url(&mut self, image_url: &Option<String>) {
        self.image_url = image_url.clone();
    }

    pub async fn db_insert(
        db: &Db,
        title: &str,
        description: &Option<String>,
        image_url: &Option<String>,
    ) -> Result<Self> {
        let id = match db {
            Db::SqliteDb(db) => db
                .insert_project(title, description, image_url)
                .await
                .map_err(Error::storage)?,
        };

        Ok(Self {
            id,
            title: title.to_owned(),
            description: description.clone(),
            image_url: image_url.clone(),
        })
    }

    pub async fn db_select(db: &Db, id: &i64) -> Result<Self> {
        let project = match db {
            Db::SqliteDb(db) => db
                .select_project(id)
                .await
                .map_err(Error::storage)?
                .map(|model| Self::from_sqlitedb_model(&model)),
        };

        project.ok_or_else(|| Error::NotFound(format!("Project with id {id} not found")))
    }

    pub async fn db_select_many(db: &Db) -> Result<Vec<Self>> {
        match db {
            Db::SqliteDb(db) => {
                let projects = db.select_many_projects().await.map_err(Error::storage)?;
                let mut projects_data = Vec::with_capacity(projects.len());
                for project in &projects {
                    projects_data.push(Self::from_sqlitedb_model(project));
                }
                Ok(projects_data)
            }
        }
    }

    /// Writes title, description and image_url back. A row that vanished in
    /// the meantime is not an error here; callers check existence first.
    pub async fn db_update(&self, db: &Db) -> Result<()> {
        let affected = match db {
            Db::SqliteDb(db) => db
                .update_project(&self.to_sqlitedb_model())
                .await
                .map_err(Error::storage)?,
        };
        if affected == 0 {
            pf_log::debug(None, format!("[Project] Update of {} matched no row", self.id));
        }
        Ok(())
    }

    pub async fn db_delete(db: &Db, id: &i64) -> Result<()> {
        match db {
            Db::SqliteDb(db) => db.delete_project(id).await.map_err(Error::storage)?,
        };
        Ok(())
    }

    fn from_sqlitedb_model(model: &ProjectSqliteModel) -> Self {
        Self {
            id: *model.id(),
            title: model.title().to_owned(),
            description: model.description().clone(),
            image_url: model.image_url().clone(),
        }
    }

    fn to_sqlitedb_model(&self) -> ProjectSqliteModel {
        ProjectSqliteModel::new(&self.id, &self.title, &self.description, &self.image_url)
    }
}
