//! File service.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator, StorageService, file_extension};
use circles_db::entities::circle_activity_log::ActivityAction;
use circles_db::entities::file::{self, FileType};
use circles_db::repositories::{CircleRepository, FileRepository, FolderRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::access::{NOT_A_MEMBER, display_names, require_member};
use super::activity::ActivityService;

/// Highest accepted price, in cents.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Whether `mime` is a `type/subtype` made of header token characters,
/// optionally followed by `; name=value` parameters.
fn is_valid_mime_type(mime: &str) -> bool {
    let is_token = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
    };

    let mut params = mime.split(';');
    let essence = params.next().unwrap_or_default();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };

    is_token(kind)
        && is_token(subtype)
        && params.all(|param| {
            param
                .trim_start_matches(' ')
                .split_once('=')
                .is_some_and(|(name, value)| is_token(name) && is_token(value.trim_matches('"')))
        })
}

/// Input for uploading a file.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileInput {
    pub circle_id: String,
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    /// Base64-encoded content.
    pub file_data: String,
    #[validate(length(min = 1, max = 255))]
    pub mime_type: String,
    #[validate(range(min = 0))]
    pub file_size: i64,
    pub folder_id: Option<String>,
}

/// Result of a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_id: String,
    pub file_url: String,
}

/// Input for setting or clearing a file's price.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPriceInput {
    pub file_id: String,
    /// Price in cents. `None` makes the file free.
    pub price: Option<i64>,
}

/// File as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    pub circle_id: String,
    pub folder_id: Option<String>,
    pub uploader_id: String,
    pub uploader_name: Option<String>,
    pub filename: String,
    pub file_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub file_type: FileType,
    pub is_paid: bool,
    pub price: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

impl FileResponse {
    /// Build a response, attaching the uploader's display name.
    #[must_use]
    pub fn from_model(model: file::Model, uploader_name: Option<String>) -> Self {
        Self {
            id: model.id,
            circle_id: model.circle_id,
            folder_id: model.folder_id,
            uploader_id: model.uploader_id,
            uploader_name,
            filename: model.filename,
            file_url: model.file_url,
            mime_type: model.mime_type,
            file_size: model.file_size,
            file_type: model.file_type,
            is_paid: model.is_paid,
            price: model.price,
            uploaded_at: model.uploaded_at.into(),
        }
    }
}

/// One of the caller's uploads, with the circle it lives in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyUploadResponse {
    #[serde(flatten)]
    pub file: FileResponse,
    pub circle_name: Option<String>,
}

/// Service for file uploads and metadata.
#[derive(Clone)]
pub struct FileService {
    file_repo: FileRepository,
    folder_repo: FolderRepository,
    circle_repo: CircleRepository,
    user_repo: UserRepository,
    activity: ActivityService,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl FileService {
    /// Create a new file service.
    #[must_use]
    pub const fn new(
        file_repo: FileRepository,
        folder_repo: FolderRepository,
        circle_repo: CircleRepository,
        user_repo: UserRepository,
        activity: ActivityService,
        storage: StorageService,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            circle_repo,
            user_repo,
            activity,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store an uploaded file and record its metadata.
    pub async fn upload(&self, user_id: &str, input: UploadFileInput) -> AppResult<UploadedFile> {
        input.validate()?;

        require_member(&self.circle_repo, &input.circle_id, user_id, NOT_A_MEMBER).await?;

        let file_type = Some(input.mime_type.as_str())
            .filter(|mime| is_valid_mime_type(mime))
            .and_then(FileType::from_mime)
            .ok_or_else(|| AppError::BadRequest("Unsupported file type".to_string()))?;

        let data = STANDARD
            .decode(input.file_data.as_bytes())
            .map_err(|_| AppError::BadRequest("Invalid file data".to_string()))?;

        if let Some(folder_id) = &input.folder_id {
            let folder = self.folder_repo.find_by_id(folder_id).await?;
            if folder.is_none_or(|f| f.circle_id != input.circle_id) {
                return Err(AppError::NotFound("Folder not found".to_string()));
            }
        }

        let key = format!(
            "circles/{}/{}-{}.{}",
            input.circle_id,
            user_id,
            self.id_gen.generate_storage_suffix(),
            file_extension(&input.filename)
        );

        let stored = self.storage.put(&key, &data, &input.mime_type).await?;

        let model = file::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(input.circle_id.clone()),
            folder_id: Set(input.folder_id),
            uploader_id: Set(user_id.to_string()),
            filename: Set(input.filename),
            file_key: Set(stored.key.clone()),
            file_url: Set(stored.url),
            mime_type: Set(input.mime_type),
            file_size: Set(input.file_size),
            file_type: Set(file_type),
            is_paid: Set(false),
            price: Set(None),
            uploaded_at: Set(Utc::now().into()),
        };

        let file = match self.file_repo.create(model).await {
            Ok(file) => file,
            Err(e) => {
                // The object has no row pointing at it
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    warn!(error = %cleanup, key = %stored.key, "Failed to remove orphaned object");
                }
                return Err(e);
            }
        };
        info!(file_id = %file.id, circle_id = %file.circle_id, size = data.len(), "Uploaded file");

        self.activity
            .record(
                &file.circle_id,
                user_id,
                ActivityAction::FileUploaded,
                &file.id,
                Some(file.filename.clone()),
            )
            .await;

        Ok(UploadedFile {
            file_id: file.id,
            file_url: file.file_url,
        })
    }

    /// File metadata without a membership check, for the public download route.
    pub async fn get_public(&self, file_id: &str) -> AppResult<file::Model> {
        self.file_repo.get_by_id(file_id).await
    }

    /// Files of a circle, newest first. Members only.
    pub async fn list(&self, user_id: &str, circle_id: &str) -> AppResult<Vec<FileResponse>> {
        require_member(&self.circle_repo, circle_id, user_id, NOT_A_MEMBER).await?;

        let files = self.file_repo.list_by_circle(circle_id).await?;
        self.with_uploader_names(files).await
    }

    /// Attach uploader display names.
    pub(crate) async fn with_uploader_names(
        &self,
        files: Vec<file::Model>,
    ) -> AppResult<Vec<FileResponse>> {
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

    /// Delete a file. Allowed for the uploader and the circle owner.
    pub async fn delete(&self, user_id: &str, file_id: &str) -> AppResult<()> {
        let file = self.file_repo.get_by_id(file_id).await?;
        let member =
            require_member(&self.circle_repo, &file.circle_id, user_id, NOT_A_MEMBER).await?;

        if file.uploader_id != user_id && !member.role.is_owner() {
            return Err(AppError::Forbidden(
                "Only uploader or circle owner can delete".to_string(),
            ));
        }

        self.file_repo.delete(&file.id).await?;

        if let Err(e) = self.storage.delete(&file.file_key).await {
            warn!(error = %e, key = %file.file_key, "Failed to delete stored object");
        }

        self.activity
            .record(
                &file.circle_id,
                user_id,
                ActivityAction::FileDeleted,
                &file.id,
                Some(file.filename),
            )
            .await;

        Ok(())
    }

    /// The caller's uploads across all circles.
    pub async fn my_uploads(&self, user_id: &str) -> AppResult<Vec<MyUploadResponse>> {
        let files = self.file_repo.list_by_uploader(user_id).await?;

        let mut circle_ids: Vec<String> = files.iter().map(|f| f.circle_id.clone()).collect();
        circle_ids.sort_unstable();
        circle_ids.dedup();

        let circle_names: HashMap<String, String> = self
            .circle_repo
            .find_by_ids(&circle_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(files
            .into_iter()
            .map(|f| MyUploadResponse {
                circle_name: circle_names.get(&f.circle_id).cloned(),
                file: FileResponse::from_model(f, None),
            })
            .collect())
    }

    /// Put a file up for sale or make it free again. Uploader only.
    pub async fn set_price(&self, user_id: &str, input: SetPriceInput) -> AppResult<FileResponse> {
        let file = self.file_repo.get_by_id(&input.file_id).await?;

        if file.uploader_id != user_id {
            return Err(AppError::Forbidden(
                "Only the uploader can set a price".to_string(),
            ));
        }

        if input.price.is_some_and(|p| p <= 0) {
            return Err(AppError::BadRequest("Price must be positive".to_string()));
        }
        if input.price.is_some_and(|p| p > MAX_PRICE_CENTS) {
            return Err(AppError::BadRequest(format!(
                "Price must not exceed {MAX_PRICE_CENTS} cents"
            )));
        }

        let mut active: file::ActiveModel = file.into();
        active.is_paid = Set(input.price.is_some());
        active.price = Set(input.price);

        let file = self.file_repo.update(active).await?;
        Ok(FileResponse::from_model(file, None))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use circles_common::{NoOpStorage, StorageBackend, StoredObject};
    use circles_db::entities::circle_activity_log;
    use circles_db::entities::circle_member::{self, CircleRole};
    use circles_db::entities::{circle, folder, user};
    use circles_db::repositories::ActivityRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult};
    use std::sync::{Arc, Mutex};

    /// Storage that remembers which keys were deleted.
    #[derive(Default)]
    struct RecordingStorage {
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl StorageBackend for RecordingStorage {
        async fn put(&self, key: &str, _data: &[u8], _content_type: &str) -> AppResult<StoredObject> {
            Ok(StoredObject {
                key: key.to_string(),
                url: self.public_url(key),
            })
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.deleted.lock().unwrap().push(key.to_string());
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("/files/{key}")
        }
    }

    fn create_test_user(id: &str, name: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            open_id: format!("oid-{id}"),
            name: Some(name.to_string()),
            email: None,
            login_method: None,
            role: user::UserRole::User,
            token: None,
            is_disabled: false,
            created_at: Utc::now().into(),
            updated_at: None,
            last_signed_in_at: None,
        }
    }

    fn member(user_id: &str, role: CircleRole) -> circle_member::Model {
        circle_member::Model {
            id: format!("m-{user_id}"),
            circle_id: "c1".to_string(),
            user_id: user_id.to_string(),
            role,
            joined_at: Utc::now().into(),
        }
    }

    fn create_test_file(uploader_id: &str) -> file::Model {
        file::Model {
            id: "f1".to_string(),
            circle_id: "c1".to_string(),
            folder_id: None,
            uploader_id: uploader_id.to_string(),
            filename: "test-image.png".to_string(),
            file_key: "circles/c1/alice-abc.png".to_string(),
            file_url: "/files/circles/c1/alice-abc.png".to_string(),
            mime_type: "image/png".to_string(),
            file_size: 4,
            file_type: FileType::Image,
            is_paid: false,
            price: None,
            uploaded_at: Utc::now().into(),
        }
    }

    fn activity_row() -> circle_activity_log::Model {
        circle_activity_log::Model {
            id: "a1".to_string(),
            circle_id: "c1".to_string(),
            user_id: Some("alice".to_string()),
            action: ActivityAction::FileUploaded,
            target_id: Some("f1".to_string()),
            target_type: Some("file".to_string()),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection) -> FileService {
        service_with_storage(db, Arc::new(NoOpStorage::new("/files".to_string())))
    }

    fn service_with_storage(db: DatabaseConnection, storage: StorageService) -> FileService {
        let db = Arc::new(db);
        let circle_repo = CircleRepository::new(db.clone());
        let user_repo = UserRepository::new(db.clone());
        let activity = ActivityService::new(
            ActivityRepository::new(db.clone()),
            circle_repo.clone(),
            user_repo.clone(),
        );
        FileService::new(
            FileRepository::new(db.clone()),
            FolderRepository::new(db),
            circle_repo,
            user_repo,
            activity,
            storage,
        )
    }

    fn upload_input(mime_type: &str) -> UploadFileInput {
        UploadFileInput {
            circle_id: "c1".to_string(),
            filename: "test-image.png".to_string(),
            file_data: STANDARD.encode(b"\x89PNG"),
            mime_type: mime_type.to_string(),
            file_size: 4,
            folder_id: None,
        }
    }

    #[tokio::test]
    async fn test_upload_image() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Owner)]])
            .append_query_results([[create_test_file("alice")]])
            .append_query_results([[activity_row()]])
            .into_connection();

        let uploaded = service(db)
            .upload("alice", upload_input("image/png"))
            .await
            .unwrap();

        assert_eq!(uploaded.file_id, "f1");
        assert!(!uploaded.file_url.is_empty());
    }

    #[tokio::test]
    async fn test_upload_by_non_member_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<circle_member::Model>::new()])
            .into_connection();

        let result = service(db).upload("bob", upload_input("image/png")).await;
        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "Not a member of this circle")
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .into_connection();

        let result = service(db)
            .upload("alice", upload_input("application/pdf"))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Unsupported file type"));
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_base64() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .into_connection();

        let mut input = upload_input("video/mp4");
        input.file_data = "not base64!!".to_string();

        let result = service(db).upload("alice", input).await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Invalid file data"));
    }

    #[tokio::test]
    async fn test_upload_rejects_folder_of_other_circle() {
        let foreign = folder::Model {
            id: "d1".to_string(),
            circle_id: "c2".to_string(),
            name: "Elsewhere".to_string(),
            description: None,
            created_by: "carol".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .append_query_results([[foreign]])
            .into_connection();

        let mut input = upload_input("audio/mpeg");
        input.folder_id = Some("d1".to_string());

        let result = service(db).upload("alice", input).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Folder not found"));
    }

    #[tokio::test]
    async fn test_delete_by_other_member_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("alice")]])
            .append_query_results([[member("bob", CircleRole::Member)]])
            .into_connection();

        let result = service(db).delete("bob", "f1").await;
        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "Only uploader or circle owner can delete")
        );
    }

    #[tokio::test]
    async fn test_owner_deletes_member_upload() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("bob")]])
            .append_query_results([[member("alice", CircleRole::Owner)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[activity_row()]])
            .into_connection();

        service(db).delete("alice", "f1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_file() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<file::Model>::new()])
            .into_connection();

        let result = service(db).delete("alice", "nope").await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "File not found"));
    }

    #[tokio::test]
    async fn test_set_price() {
        let mut priced = create_test_file("alice");
        priced.is_paid = true;
        priced.price = Some(990);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("alice")]])
            .append_query_results([[priced]])
            .into_connection();

        let file = service(db)
            .set_price(
                "alice",
                SetPriceInput {
                    file_id: "f1".to_string(),
                    price: Some(990),
                },
            )
            .await
            .unwrap();

        assert!(file.is_paid);
        assert_eq!(file.price, Some(990));
    }

    #[tokio::test]
    async fn test_set_price_rules() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("alice")]])
            .append_query_results([[create_test_file("alice")]])
            .into_connection();
        let service = service(db);

        let not_uploader = service
            .set_price(
                "bob",
                SetPriceInput {
                    file_id: "f1".to_string(),
                    price: Some(100),
                },
            )
            .await;
        assert!(matches!(not_uploader, Err(AppError::Forbidden(_))));

        let negative = service
            .set_price(
                "alice",
                SetPriceInput {
                    file_id: "f1".to_string(),
                    price: Some(0),
                },
            )
            .await;
        assert!(matches!(negative, Err(AppError::BadRequest(msg)) if msg == "Price must be positive"));
    }

    #[test]
    fn test_mime_type_shape() {
        assert!(is_valid_mime_type("image/png"));
        assert!(is_valid_mime_type("video/mp4; codecs=avc1.42E01E"));
        assert!(is_valid_mime_type("audio/ogg;codecs=\"opus\""));
        assert!(!is_valid_mime_type("image"));
        assert!(!is_valid_mime_type("image/"));
        assert!(!is_valid_mime_type("image/png\r\nX-Injected: 1"));
        assert!(!is_valid_mime_type("image/p ng"));
    }

    #[tokio::test]
    async fn test_upload_rejects_malformed_mime_type() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .into_connection();

        let result = service(db)
            .upload("alice", upload_input("image/png\u{7}"))
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Unsupported file type"));
    }

    #[tokio::test]
    async fn test_upload_removes_object_when_insert_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let storage = Arc::new(RecordingStorage::default());

        let result = service_with_storage(db, storage.clone())
            .upload("alice", upload_input("image/png"))
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        let deleted = storage.deleted.lock().unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].starts_with("circles/c1/alice-"));
        assert!(deleted[0].ends_with(".png"));
    }

    #[tokio::test]
    async fn test_list_by_non_member_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<circle_member::Model>::new()])
            .into_connection();

        let result = service(db).list("bob", "c1").await;
        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "Not a member of this circle")
        );
    }

    #[tokio::test]
    async fn test_list_keeps_newest_first_and_names_uploaders() {
        let mut newer = create_test_file("bob");
        newer.id = "f2".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[member("alice", CircleRole::Member)]])
            .append_query_results([[newer, create_test_file("alice")]])
            .append_query_results([[create_test_user("alice", "Alice"), create_test_user("bob", "Bob")]])
            .into_connection();

        let files = service(db).list("alice", "c1").await.unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "f2");
        assert_eq!(files[0].uploader_name.as_deref(), Some("Bob"));
        assert_eq!(files[1].id, "f1");
        assert_eq!(files[1].uploader_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_set_price_above_maximum_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("alice")]])
            .into_connection();

        let result = service(db)
            .set_price(
                "alice",
                SetPriceInput {
                    file_id: "f1".to_string(),
                    price: Some(MAX_PRICE_CENTS + 1),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.starts_with("Price must not exceed")));
    }

    #[tokio::test]
    async fn test_my_uploads_names_circles() {
        let mut other = create_test_file("alice");
        other.id = "f2".to_string();
        other.circle_id = "c2".to_string();

        let club = circle::Model {
            id: "c1".to_string(),
            name: "Photo Club".to_string(),
            description: None,
            creator_id: "alice".to_string(),
            is_public: true,
            invitation_code: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_file("alice"), other]])
            .append_query_results([[club]])
            .into_connection();

        let uploads = service(db).my_uploads("alice").await.unwrap();

        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].circle_name.as_deref(), Some("Photo Club"));
        assert_eq!(uploads[1].file.id, "f2");
        assert!(uploads[1].circle_name.is_none());
    }
}
