//! Folder service.
//!
//! Folders group files inside a circle. Any member may manage them; deleting
//! a folder moves its files back to the circle root.

use chrono::{DateTime, Utc};
use circles_common::{AppResult, IdGenerator};
use circles_db::entities::circle_activity_log::ActivityAction;
use circles_db::entities::folder;
use circles_db::repositories::{CircleRepository, FileRepository, FolderRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::access::{NOT_A_MEMBER, display_names, require_member};
use super::activity::ActivityService;
use super::file::FileResponse;

/// Input for creating a folder.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderInput {
    pub circle_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Input for renaming a folder.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameFolderInput {
    pub folder_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Folder with its creator's display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: String,
    pub circle_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub creator_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FolderResponse {
    fn from_model(model: folder::Model, creator_name: Option<String>) -> Self {
        Self {
            id: model.id,
            circle_id: model.circle_id,
            name: model.name,
            description: model.description,
            created_by: model.created_by,
            creator_name,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Service for circle folders.
#[derive(Clone)]
pub struct FolderService {
    folder_repo: FolderRepository,
    file_repo: FileRepository,
    circle_repo: CircleRepository,
    user_repo: UserRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl FolderService {
    /// Create a new folder service.
    #[must_use]
    pub const fn new(
        folder_repo: FolderRepository,
        file_repo: FileRepository,
        circle_repo: CircleRepository,
        user_repo: UserRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            circle_repo,
            user_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a folder. Returns the new folder.
    pub async fn create(&self, user_id: &str, input: CreateFolderInput) -> AppResult<folder::Model> {
        input.validate()?;
        require_member(&self.circle_repo, &input.circle_id, user_id, NOT_A_MEMBER).await?;

        let model = folder::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(input.circle_id),
            name: Set(input.name),
            description: Set(input.description.filter(|d| !d.is_empty())),
            created_by: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let folder = self.folder_repo.create(model).await?;

        self.activity
            .record(
                &folder.circle_id,
                user_id,
                ActivityAction::FolderCreated,
                &folder.id,
                Some(folder.name.clone()),
            )
            .await;

        Ok(folder)
    }

    /// Folders of a circle, newest first.
    pub async fn list(&self, user_id: &str, circle_id: &str) -> AppResult<Vec<FolderResponse>> {
        require_member(&self.circle_repo, circle_id, user_id, NOT_A_MEMBER).await?;

        let folders = self.folder_repo.list_by_circle(circle_id).await?;
        let names = display_names(
            &self.user_repo,
            folders.iter().map(|f| f.created_by.clone()).collect(),
        )
        .await?;

        Ok(folders
            .into_iter()
            .map(|f| {
                let name = names.get(&f.created_by).cloned();
                FolderResponse::from_model(f, name)
            })
            .collect())
    }

    /// Rename a folder.
    pub async fn rename(&self, user_id: &str, input: RenameFolderInput) -> AppResult<folder::Model> {
        input.validate()?;

        let folder = self.folder_repo.get_by_id(&input.folder_id).await?;
        require_member(&self.circle_repo, &folder.circle_id, user_id, NOT_A_MEMBER).await?;

        let mut active: folder::ActiveModel = folder.into();
        active.name = Set(input.name);
        active.updated_at = Set(Some(Utc::now().into()));

        self.folder_repo.update(active).await
    }

    /// Delete a folder, keeping its files.
    pub async fn delete(&self, user_id: &str, folder_id: &str) -> AppResult<()> {
        let folder = self.folder_repo.get_by_id(folder_id).await?;
        require_member(&self.circle_repo, &folder.circle_id, user_id, NOT_A_MEMBER).await?;

        let detached = self.folder_repo.delete_and_detach_files(&folder.id).await?;
        info!(folder_id = %folder.id, detached, "Deleted folder");

        self.activity
            .record(
                &folder.circle_id,
                user_id,
                ActivityAction::FolderDeleted,
                &folder.id,
                Some(folder.name),
            )
            .await;

        Ok(())
    }

    /// Files in a folder, newest first.
    pub async fn files(&self, user_id: &str, folder_id: &str) -> AppResult<Vec<FileResponse>> {
        let folder = self.folder_repo.get_by_id(folder_id).await?;
        require_member(&self.circle_repo, &folder.circle_id, user_id, NOT_A_MEMBER).await?;

        let files = self.file_repo.list_by_folder(&folder.id).await?;
        let names = display_names(
            &self.user_repo,
            files.iter().map(|f| f.uploader_id.clone()).collect(),
        )
        .await?;

        Ok(files
            .into_iter()
            .map(|f| {
                let name = names.get(&f.uploader_id).cloned();
                FileResponse::from_model(f, name)
            })
            .collect())
    }
}
