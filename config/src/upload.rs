use serde::Deserialize;

#[derive(Deserialize)]
pub struct UploadConfig {
    path: String,
}

impl UploadConfig {
    pub fn path(&self) -> &str {
        &self.path
    }
}
