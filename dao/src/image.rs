use std::{
    io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use pf_error::Result;
use tokio::fs;

use crate::project::ProjectDao;

// the part of an image_url after this prefix is a plain file name inside the
// upload root
pub const URL_PREFIX: &str = "static/uploads";

const FALLBACK_FILE_NAME: &str = "image";

// keeps `<id>_<name>` and its staging name well below the usual 255 byte limit
const MAX_FILE_NAME_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct ImageUpload {
    source: PathBuf,
    file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(source: &Path, file_name: &Option<String>) -> Self {
        Self {
            source: source.to_owned(),
            file_name: file_name.clone(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn file_name(&self) -> &Option<String> {
        &self.file_name
    }
}

pub struct ImageStorage {
    root: PathBuf,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn init(&self) -> Result<()> {
        pf_log::info(
            Some("🔧"),
            format!("[Image] Using upload root {}", self.root.display()),
        );
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn storage_key(project_id: &i64, file_name: &Option<String>) -> String {
        format!("{project_id}_{}", sanitize_file_name(file_name))
    }

    pub fn url_for(key: &str) -> String {
        format!("{URL_PREFIX}/{key}")
    }

    pub fn resolve(&self, image_url: &str) -> Option<PathBuf> {
        let file_name = image_url.strip_prefix(URL_PREFIX)?.strip_prefix('/')?;
        self.resolve_file_name(file_name)
    }

    pub fn resolve_file_name(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\', '\0'])
        {
            return None;
        }
        Some(self.root.join(file_name))
    }

    pub async fn attach_on_create(
        &self,
        project_id: &i64,
        upload: Option<&ImageUpload>,
    ) -> Result<Option<String>> {
        match upload {
            Some(upload) => Ok(Some(self.store(project_id, upload).await?)),
            None => Ok(None),
        }
    }

    /// The delete flag wins over a new upload. A new upload is written
    /// immediately; the superseded file is only removed by
    /// [`ImageChange::reclaim`] once the record is committed.
    pub async fn reconcile(
        &self,
        project: &ProjectDao,
        delete_image: &bool,
        upload: Option<&ImageUpload>,
    ) -> Result<ImageChange> {
        let current = project.image_url().clone();

        if *delete_image {
            return Ok(ImageChange {
                image_url: None,
                written: None,
                superseded: current,
            });
        }

        match upload {
            Some(upload) => {
                let image_url = self.store(project.id(), upload).await?;
                let overwrote_current = current.as_deref() == Some(image_url.as_str());
                Ok(ImageChange {
                    image_url: Some(image_url.clone()),
                    written: (!overwrote_current).then_some(image_url),
                    superseded: if overwrote_current { None } else { current },
                })
            }
            None => Ok(ImageChange {
                image_url: current,
                written: None,
                superseded: None,
            }),
        }
    }

    pub async fn delete_for_project(&self, project: &ProjectDao) -> Result<()> {
        match project.image_url() {
            Some(image_url) => self.discard(image_url).await,
            None => Ok(()),
        }
    }

    pub async fn discard(&self, image_url: &str) -> Result<()> {
        let Some(path) = self.resolve(image_url) else {
            pf_log::warn(
                None,
                format!("[Image] Refusing to remove '{image_url}': not inside the upload root"),
            );
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                pf_log::debug(None, format!("[Image] Removed {}", path.display()));
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, project_id: &i64, upload: &ImageUpload) -> Result<String> {
        let key = Self::storage_key(project_id, upload.file_name());
        let dest = self.root.join(&key);

        // the key may be the file the record points at right now, so it is
        // only replaced once the copy is complete
        let staging = self.root.join(format!(
            ".{key}.{}.part",
            STAGING_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(err) = fs::copy(upload.source(), &staging).await {
            remove_staging(&staging).await;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&staging, &dest).await {
            remove_staging(&staging).await;
            return Err(err.into());
        }

        pf_log::debug(None, format!("[Image] Stored {}", dest.display()));
        Ok(Self::url_for(&key))
    }
}

async fn remove_staging(staging: &Path) {
    if let Err(err) = fs::remove_file(staging).await {
        if err.kind() != io::ErrorKind::NotFound {
            pf_log::warn(
                None,
                format!("[Image] Failed to remove {}: {err}", staging.display()),
            );
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ImageChange {
    image_url: Option<String>,
    written: Option<String>,
    superseded: Option<String>,
}

impl ImageChange {
    pub fn image_url(&self) -> &Option<String> {
        &self.image_url
    }

    pub async fn reclaim(&self, storage: &ImageStorage) -> Result<()> {
        match &self.superseded {
            Some(image_url) => storage.discard(image_url).await,
            None => Ok(()),
        }
    }

    pub async fn revert(&self, storage: &ImageStorage) -> Result<()> {
        match &self.written {
            Some(image_url) => storage.discard(image_url).await,
            None => Ok(()),
        }
    }
}

fn sanitize_file_name(file_name: &Option<String>) -> String {
    let base = file_name
        .as_deref()
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();

    let clean: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if clean.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        truncate_file_name(clean)
    }
}

fn truncate_file_name(name: String) -> String {
    if name.len() <= MAX_FILE_NAME_BYTES {
        return name;
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.len() <= MAX_EXTENSION_BYTES =>
        {
            (stem, Some(ext))
        }
        _ => (name.as_str(), None),
    };

    let budget = MAX_FILE_NAME_BYTES - extension.map_or(0, |ext| ext.len() + 1);
    let mut end = budget.min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    match extension {
        Some(ext) => format!("{}.{ext}", &stem[..end]),
        None => stem[..end].to_owned(),
    }
}
