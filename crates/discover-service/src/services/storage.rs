//! Image upload service
//!
//! Uploads land at `uploads/<user key>/<id>-<file name>`; a user may only
//! delete objects under their own prefix unless they are the admin.

use discover_common::AppError;
use discover_core::{StorageUrl, UserKey};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const UPLOAD_ROOT: &str = "uploads";
const MAX_FILE_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
}

pub struct StorageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StorageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        viewer: Option<&UserKey>,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<UploadedImage> {
        let owner = viewer.ok_or(AppError::MissingAuth)?;
        if bytes.is_empty() {
            return Err(ServiceError::validation("File is empty"));
        }

        let path = format!(
            "{}{}-{}",
            owner_prefix(owner),
            self.ctx.generate_id(),
            sanitize_file_name(file_name)
        );
        let url = self
            .ctx
            .blob_store()
            .upload(&path, bytes, content_type)
            .await?;

        info!(owner = %owner, path, "Image uploaded");
        Ok(UploadedImage { url, path })
    }

    /// Delete by download URL; owner prefix or admin
    #[instrument(skip(self))]
    pub async fn delete_image(&self, viewer: &UserKey, url: &str) -> ServiceResult<()> {
        let parsed = StorageUrl::parse(url)?;
        if !parsed.path().starts_with(&owner_prefix(viewer)) && !self.ctx.is_admin(viewer) {
            return Err(ServiceError::permission_denied("delete this image"));
        }

        self.ctx.blob_store().delete(parsed.path()).await?;
        info!(by = %viewer, path = parsed.path(), "Image deleted");
        Ok(())
    }
}

/// `/` and `%` are legal in an email local part, so escape them
pub(crate) fn owner_prefix(owner: &UserKey) -> String {
    let segment = owner
        .as_str()
        .replace('%', "%25")
        .replace('/', "%2F")
        .replace('\\', "%5C");
    format!("{UPLOAD_ROOT}/{segment}/")
}

fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}
