use pf_db_sqlite::db::SqliteDb;

pub mod image;
pub mod project;

pub enum Db {
    SqliteDb(SqliteDb),
}

impl Db {
    pub async fn close(&self) {
        match self {
            Db::SqliteDb(db) => db.close().await,
        }
    }
}
