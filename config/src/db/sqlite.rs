use serde::Deserialize;

#[derive(Deserialize)]
pub struct DbSqliteConfig {
    path: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl DbSqliteConfig {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn max_connections(&self) -> &u32 {
        &self.max_connections
    }
}
