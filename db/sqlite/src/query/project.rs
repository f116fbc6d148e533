use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};

use crate::{db::SqliteDb, model::project::ProjectModel};

const INSERT: &str =
    "INSERT INTO \"projects\" (\"title\", \"description\", \"image_url\") VALUES (?, ?, ?)";
const SELECT: &str = "SELECT \"id\", \"title\", \"description\", \"image_url\" FROM \"projects\" WHERE \"id\" = ?";
const SELECT_MANY: &str =
    "SELECT \"id\", \"title\", \"description\", \"image_url\" FROM \"projects\" ORDER BY \"id\"";
const UPDATE: &str = "UPDATE \"projects\" SET \"title\" = ?, \"description\" = ?, \"image_url\" = ? WHERE \"id\" = ?";
const DELETE: &str = "DELETE FROM \"projects\" WHERE \"id\" = ?";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    pf_log::info(Some("🔧"), "[SQLite] Setting up projects table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"projects\" (\"id\" integer PRIMARY KEY AUTOINCREMENT, \"title\" text NOT NULL, \"description\" text, \"image_url\" text)").await?;

    pool.prepare(INSERT).await?;
    pool.prepare(SELECT).await?;
    pool.prepare(SELECT_MANY).await?;
    pool.prepare(UPDATE).await?;
    pool.prepare(DELETE).await?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_project(
        &self,
        title: &str,
        description: &Option<String>,
        image_url: &Option<String>,
    ) -> Result<i64> {
        let res = self
            .execute(
                sqlx::query(INSERT)
                    .bind(title)
                    .bind(description)
                    .bind(image_url),
            )
            .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn select_project(&self, id: &i64) -> Result<Option<ProjectModel>> {
        Ok(self.fetch_optional(sqlx::query_as(SELECT).bind(id)).await?)
    }

    pub async fn select_many_projects(&self) -> Result<Vec<ProjectModel>> {
        Ok(self.fetch_all(sqlx::query_as(SELECT_MANY)).await?)
    }

    /// Overwrites every mutable column. Returns the number of rows touched,
    /// which is zero when the id does not exist.
    pub async fn update_project(&self, value: &ProjectModel) -> Result<u64> {
        let res = self
            .execute(
                sqlx::query(UPDATE)
                    .bind(value.title())
                    .bind(value.description())
                    .bind(value.image_url())
                    .bind(value.id()),
            )
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn delete_project(&self, id: &i64) -> Result<u64> {
        let res = self.execute(sqlx::query(DELETE).bind(id)).await?;
        Ok(res.rows_affected())
    }
}
