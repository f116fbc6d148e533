use serde::Deserialize;

#[derive(Deserialize)]
pub struct FindOneUploadReqPath {
    file_name: String,
}

impl FindOneUploadReqPath {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
