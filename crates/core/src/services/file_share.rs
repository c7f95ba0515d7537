//! File share links.
//!
//! A share link lets anyone holding its token fetch one file without being a
//! member of the circle. Expiry is checked when the link is read.

use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::file_share_link;
use circles_db::repositories::{CircleRepository, FileRepository, FileShareLinkRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::access::{NOT_A_MEMBER, require_member};
use super::file::FileResponse;

/// Input for creating a share link.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareLinkInput {
    pub file_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Newly created link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkCreated {
    pub link_id: String,
    pub token: String,
}

/// Share link as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub id: String,
    pub file_id: String,
    pub token: String,
    pub created_by: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub download_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<file_share_link::Model> for ShareLinkResponse {
    fn from(model: file_share_link::Model) -> Self {
        Self {
            id: model.id,
            file_id: model.file_id,
            token: model.token,
            created_by: model.created_by,
            expires_at: model.expires_at.map(Into::into),
            download_count: model.download_count,
            created_at: model.created_at.into(),
        }
    }
}

/// A shared file together with the link that granted access.
#[derive(Debug, Serialize)]
pub struct SharedFileResponse {
    pub file: FileResponse,
    pub link: ShareLinkResponse,
}

/// Service for file share links.
#[derive(Clone)]
pub struct FileShareService {
    link_repo: FileShareLinkRepository,
    file_repo: FileRepository,
    circle_repo: CircleRepository,
    id_gen: IdGenerator,
}

impl FileShareService {
    /// Create a new file share service.
    #[must_use]
    pub const fn new(
        link_repo: FileShareLinkRepository,
        file_repo: FileRepository,
        circle_repo: CircleRepository,
    ) -> Self {
        Self {
            link_repo,
            file_repo,
            circle_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a link for a file. Members of the file's circle only.
    pub async fn create_link(
        &self,
        user_id: &str,
        input: CreateShareLinkInput,
    ) -> AppResult<ShareLinkCreated> {
        let file = self.file_repo.get_by_id(&input.file_id).await?;
        require_member(&self.circle_repo, &file.circle_id, user_id, NOT_A_MEMBER).await?;

        let model = file_share_link::ActiveModel {
            id: Set(self.id_gen.generate()),
            file_id: Set(file.id),
            token: Set(self.id_gen.generate_share_token()),
            created_by: Set(user_id.to_string()),
            expires_at: Set(input.expires_at.map(Into::into)),
            download_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let link = self.link_repo.create(model).await?;
        info!(link_id = %link.id, file_id = %link.file_id, "Created share link");

        Ok(ShareLinkCreated {
            link_id: link.id,
            token: link.token,
        })
    }

    /// Resolve a token to its file, counting the access.
    pub async fn get_by_token(&self, token: &str) -> AppResult<SharedFileResponse> {
        let mut link = self
            .link_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found".to_string()))?;

        if link.is_expired_at(Utc::now().into()) {
            return Err(AppError::BadRequest("Share link has expired".to_string()));
        }

        let file = self.file_repo.get_by_id(&link.file_id).await?;

        self.link_repo.increment_download_count(&link.id).await?;
        link.download_count += 1;

        Ok(SharedFileResponse {
            file: FileResponse::from_model(file, None),
            link: link.into(),
        })
    }

    /// Delete a link. Allowed for its creator and the circle owner.
    pub async fn delete_link(&self, user_id: &str, link_id: &str) -> AppResult<()> {
        let link = self
            .link_repo
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found".to_string()))?;

        if link.created_by != user_id {
            let file = self.file_repo.get_by_id(&link.file_id).await?;
            let is_owner = self
                .circle_repo
                .get_member(&file.circle_id, user_id)
                .await?
                .is_some_and(|m| m.role.is_owner());

            if !is_owner {
                return Err(AppError::Forbidden(
                    "Only the link creator or circle owner can delete".to_string(),
                ));
            }
        }

        self.link_repo.delete(&link.id).await
    }
}
