//! Circle service.
//!
//! Membership and ownership rules for circles. Exactly one owner exists per
//! circle: the creator, enrolled in the same transaction that creates the
//! circle. Owners cannot leave or be removed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use circles_common::{AppError, AppResult, IdGenerator};
use circles_db::entities::circle_activity_log::ActivityAction;
use circles_db::entities::circle_member::CircleRole;
use circles_db::entities::{circle, circle_member};
use circles_db::repositories::{CircleRepository, FileRepository, UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::access::{display_names, require_owner};
use super::activity::ActivityService;
use super::file::FileResponse;

/// Attempts made to find an unused invitation code.
const INVITATION_CODE_ATTEMPTS: usize = 5;

/// Input for creating a circle.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCircleInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// Input for updating a circle. An empty description clears it.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCircleInput {
    pub circle_id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Circle as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub is_public: bool,
    pub invitation_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<circle::Model> for CircleResponse {
    fn from(model: circle::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            creator_id: model.creator_id,
            is_public: model.is_public,
            invitation_code: model.invitation_code,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.map(Into::into),
        }
    }
}

/// Public circle with its member count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCircleResponse {
    #[serde(flatten)]
    pub circle: CircleResponse,
    pub member_count: i64,
}

/// Circle the caller belongs to, with their role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyCircleResponse {
    #[serde(flatten)]
    pub circle: CircleResponse,
    pub role: CircleRole,
    pub joined_at: DateTime<Utc>,
}

/// Circle member with display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub role: CircleRole,
    pub joined_at: DateTime<Utc>,
}

/// Everything a member sees on a circle page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleDetailResponse {
    #[serde(flatten)]
    pub circle: CircleResponse,
    pub members: Vec<MemberResponse>,
    pub files: Vec<FileResponse>,
    pub user_role: CircleRole,
}

/// Attach member counts to a list of circles.
pub(crate) async fn with_member_counts(
    circle_repo: &CircleRepository,
    circles: Vec<circle::Model>,
) -> AppResult<Vec<PublicCircleResponse>> {
    let ids: Vec<String> = circles.iter().map(|c| c.id.clone()).collect();
    let counts = circle_repo.member_counts(&ids).await?;

    Ok(circles
        .into_iter()
        .map(|c| PublicCircleResponse {
            member_count: counts.get(&c.id).copied().unwrap_or(0),
            circle: c.into(),
        })
        .collect())
}

/// Service for managing circles and memberships.
#[derive(Clone)]
pub struct CircleService {
    circle_repo: CircleRepository,
    file_repo: FileRepository,
    user_repo: UserRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl CircleService {
    /// Create a new circle service.
    #[must_use]
    pub const fn new(
        circle_repo: CircleRepository,
        file_repo: FileRepository,
        user_repo: UserRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            circle_repo,
            file_repo,
            user_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a circle owned by `user_id`.
    ///
    /// Private circles get a fresh invitation code. Codes are drawn at most
    /// [`INVITATION_CODE_ATTEMPTS`] times before giving up.
    pub async fn create(&self, user_id: &str, input: CreateCircleInput) -> AppResult<circle::Model> {
        input.validate()?;

        if input.is_public {
            return self.insert_with_owner(user_id, &input, None).await;
        }

        for attempt in 1..=INVITATION_CODE_ATTEMPTS {
            let code = self.id_gen.generate_invitation_code();

            if self.circle_repo.invitation_code_exists(&code).await? {
                debug!(attempt, "Invitation code already taken");
                continue;
            }

            match self.insert_with_owner(user_id, &input, Some(code)).await {
                Err(AppError::Conflict(detail)) => {
                    debug!(attempt, %detail, "Invitation code collided on insert");
                }
                result => return result,
            }
        }

        Err(AppError::CodeAllocation(
            "Could not allocate a unique invitation code".to_string(),
        ))
    }

    async fn insert_with_owner(
        &self,
        user_id: &str,
        input: &CreateCircleInput,
        invitation_code: Option<String>,
    ) -> AppResult<circle::Model> {
        let circle_id = self.id_gen.generate();
        let now = Utc::now();

        let circle = circle::ActiveModel {
            id: Set(circle_id.clone()),
            name: Set(input.name.clone()),
            description: Set(input.description.clone().filter(|d| !d.is_empty())),
            creator_id: Set(user_id.to_string()),
            is_public: Set(input.is_public),
            invitation_code: Set(invitation_code),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let owner = circle_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(circle_id),
            user_id: Set(user_id.to_string()),
            role: Set(CircleRole::Owner),
            joined_at: Set(now.into()),
        };

        let (circle, _) = self.circle_repo.create_with_owner(circle, owner).await?;
        info!(circle_id = %circle.id, owner_id = %user_id, "Created circle");

        Ok(circle)
    }

    /// Circle page for a member: circle, members, files and the caller's role.
    pub async fn get(&self, user_id: &str, circle_id: &str) -> AppResult<CircleDetailResponse> {
        let circle = self.circle_repo.get_by_id(circle_id).await?;

        let member = self
            .circle_repo
            .get_member(circle_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not a member of this circle".to_string())
            })?;

        let members = self.circle_repo.list_members(circle_id).await?;
        let files = self.file_repo.list_by_circle(circle_id).await?;

        let names = display_names(
            &self.user_repo,
            members
                .iter()
                .map(|m| m.user_id.clone())
                .chain(files.iter().map(|f| f.uploader_id.clone()))
                .collect(),
        )
        .await?;

        let members = members
            .into_iter()
            .map(|m| MemberResponse {
                name: names.get(&m.user_id).cloned(),
                id: m.id,
                user_id: m.user_id,
                role: m.role,
                joined_at: m.joined_at.into(),
            })
            .collect();

        let files = files
            .into_iter()
            .map(|f| {
                let uploader_name = names.get(&f.uploader_id).cloned();
                FileResponse::from_model(f, uploader_name)
            })
            .collect();

        Ok(CircleDetailResponse {
            circle: circle.into(),
            members,
            files,
            user_role: member.role,
        })
    }

    /// Circles the user belongs to, newest membership first.
    pub async fn list_mine(&self, user_id: &str) -> AppResult<Vec<MyCircleResponse>> {
        let memberships = self.circle_repo.memberships_for_user(user_id).await?;
        let ids: Vec<String> = memberships.iter().map(|m| m.circle_id.clone()).collect();

        let mut circles: HashMap<String, circle::Model> = self
            .circle_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        Ok(memberships
            .into_iter()
            .filter_map(|m| {
                circles.remove(&m.circle_id).map(|c| MyCircleResponse {
                    circle: c.into(),
                    role: m.role,
                    joined_at: m.joined_at.into(),
                })
            })
            .collect())
    }

    /// Public circles with member counts.
    pub async fn list_public(&self) -> AppResult<Vec<PublicCircleResponse>> {
        let circles = self.circle_repo.list_public().await?;
        with_member_counts(&self.circle_repo, circles).await
    }

    /// Look up a circle by invitation code.
    pub async fn find_by_invitation_code(&self, code: &str) -> AppResult<circle::Model> {
        self.circle_repo
            .find_by_invitation_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid invitation code".to_string()))
    }

    /// Join a circle by ID.
    pub async fn join(&self, user_id: &str, circle_id: &str) -> AppResult<()> {
        let circle = self.circle_repo.get_by_id(circle_id).await?;

        if self.circle_repo.get_member(&circle.id, user_id).await?.is_some() {
            return Err(AppError::BadRequest("Already a member".to_string()));
        }

        self.enroll(&circle.id, user_id, "Already a member").await
    }

    /// Join a circle through its invitation code. Returns the circle ID.
    pub async fn join_by_invitation_code(&self, user_id: &str, code: &str) -> AppResult<String> {
        let circle = self.find_by_invitation_code(code).await?;

        if self.circle_repo.get_member(&circle.id, user_id).await?.is_some() {
            return Err(AppError::BadRequest(
                "Already a member of this circle".to_string(),
            ));
        }

        self.enroll(&circle.id, user_id, "Already a member of this circle")
            .await?;

        Ok(circle.id)
    }

    async fn enroll(&self, circle_id: &str, user_id: &str, duplicate_message: &str) -> AppResult<()> {
        let model = circle_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            circle_id: Set(circle_id.to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(CircleRole::Member),
            joined_at: Set(Utc::now().into()),
        };

        // A concurrent join can slip past the pre-check; the unique index catches it
        match self.circle_repo.add_member(model).await {
            Err(AppError::Conflict(_)) => {
                return Err(AppError::BadRequest(duplicate_message.to_string()));
            }
            result => result?,
        };

        self.activity
            .record(circle_id, user_id, ActivityAction::MemberJoined, user_id, None)
            .await;

        Ok(())
    }

    /// Leave a circle. Owners must delete the circle instead.
    pub async fn leave(&self, user_id: &str, circle_id: &str) -> AppResult<()> {
        let member = self
            .circle_repo
            .get_member(circle_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not a member".to_string()))?;

        if member.role.is_owner() {
            return Err(AppError::BadRequest(
                "Owner cannot leave. Delete the circle instead.".to_string(),
            ));
        }

        self.circle_repo.remove_member(circle_id, user_id).await?;

        self.activity
            .record(circle_id, user_id, ActivityAction::MemberLeft, user_id, None)
            .await;

        Ok(())
    }

    /// Remove another member. Owner only; the owner row itself is protected.
    pub async fn remove_member(
        &self,
        owner_id: &str,
        circle_id: &str,
        target_user_id: &str,
    ) -> AppResult<()> {
        require_owner(
            &self.circle_repo,
            circle_id,
            owner_id,
            "Only circle owner can remove members",
        )
        .await?;

        let target = self
            .circle_repo
            .get_member(circle_id, target_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        if target.role.is_owner() {
            return Err(AppError::BadRequest("Cannot remove owner".to_string()));
        }

        self.circle_repo
            .remove_member(circle_id, target_user_id)
            .await?;

        self.activity
            .record(
                circle_id,
                owner_id,
                ActivityAction::MemberRemoved,
                target_user_id,
                None,
            )
            .await;

        Ok(())
    }

    /// Add a member by email address. Owners only; lookup by email is not supported.
    pub async fn add_member_by_email(
        &self,
        owner_id: &str,
        circle_id: &str,
        _email: &str,
    ) -> AppResult<()> {
        require_owner(
            &self.circle_repo,
            circle_id,
            owner_id,
            "Only circle owner can add members",
        )
        .await?;

        Err(AppError::NotImplemented(
            "User lookup by email not yet implemented. Use join link instead.".to_string(),
        ))
    }

    /// Update name or description. Owner only.
    pub async fn update(&self, user_id: &str, input: UpdateCircleInput) -> AppResult<circle::Model> {
        input.validate()?;

        require_owner(
            &self.circle_repo,
            &input.circle_id,
            user_id,
            "Only circle owner can update",
        )
        .await?;

        let circle = self.circle_repo.get_by_id(&input.circle_id).await?;
        let mut active: circle::ActiveModel = circle.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description).filter(|d| !d.is_empty()));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let circle = self.circle_repo.update(active).await?;

        self.activity
            .record(
                &circle.id,
                user_id,
                ActivityAction::CircleUpdated,
                &circle.id,
                None,
            )
            .await;

        Ok(circle)
    }

    /// Delete a circle and everything in it. Owner only.
    pub async fn delete(&self, user_id: &str, circle_id: &str) -> AppResult<()> {
        require_owner(
            &self.circle_repo,
            circle_id,
            user_id,
            "Only circle owner can delete",
        )
        .await?;

        self.circle_repo.delete(circle_id).await?;
        info!(circle_id = %circle_id, "Deleted circle");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use circles_db::entities::circle_activity_log;
    use circles_db::repositories::ActivityRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_circle(id: &str, is_public: bool) -> circle::Model {
        circle::Model {
            id: id.to_string(),
            name: "Test Circle".to_string(),
            description: None,
            creator_id: "alice".to_string(),
            is_public,
            invitation_code: (!is_public).then(|| "INVITE42".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_member(circle_id: &str, user_id: &str, role: CircleRole) -> circle_member::Model {
        circle_member::Model {
            id: format!("m-{user_id}"),
            circle_id: circle_id.to_string(),
            user_id: user_id.to_string(),
            role,
            joined_at: Utc::now().into(),
        }
    }

    fn activity_row() -> circle_activity_log::Model {
        circle_activity_log::Model {
            id: "a1".to_string(),
            circle_id: "c1".to_string(),
            user_id: Some("bob".to_string()),
            action: ActivityAction::MemberJoined,
            target_id: Some("bob".to_string()),
            target_type: Some("user".to_string()),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    fn count(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    fn service(db: DatabaseConnection) -> CircleService {
        let db = Arc::new(db);
        let circle_repo = CircleRepository::new(db.clone());
        let user_repo = UserRepository::new(db.clone());
        let activity = ActivityService::new(
            ActivityRepository::new(db.clone()),
            circle_repo.clone(),
            user_repo.clone(),
        );
        CircleService::new(circle_repo, FileRepository::new(db), user_repo, activity)
    }

    fn input(is_public: bool) -> CreateCircleInput {
        CreateCircleInput {
            name: "Test Circle".to_string(),
            description: None,
            is_public,
        }
    }

    #[tokio::test]
    async fn test_create_public_circle_enrolls_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_circle("c1", true)]])
            .append_query_results([[create_test_member("c1", "alice", CircleRole::Owner)]])
            .into_connection();

        let circle = service(db).create("alice", input(true)).await.unwrap();

        assert_eq!(circle.id, "c1");
        assert!(circle.invitation_code.is_none());
    }

    #[tokio::test]
    async fn test_create_private_circle_retries_taken_codes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count(1)]])
            .append_query_results([[count(0)]])
            .append_query_results([[create_test_circle("c1", false)]])
            .append_query_results([[create_test_member("c1", "alice", CircleRole::Owner)]])
            .into_connection();

        let circle = service(db).create("alice", input(false)).await.unwrap();

        assert_eq!(circle.invitation_code.as_deref(), Some("INVITE42"));
    }

    #[tokio::test]
    async fn test_create_private_circle_gives_up_after_bounded_attempts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count(1)]])
            .append_query_results([[count(1)]])
            .append_query_results([[count(1)]])
            .append_query_results([[count(1)]])
            .append_query_results([[count(1)]])
            .into_connection();

        let result = service(db).create("alice", input(false)).await;

        assert!(matches!(result, Err(AppError::CodeAllocation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut bad = input(true);
        bad.name = String::new();

        let result = service(db).create("alice", bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_join_then_join_again() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // first join
            .append_query_results([[create_test_circle("c1", true)]])
            .append_query_results([Vec::<circle_member::Model>::new()])
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .append_query_results([[activity_row()]])
            // second join
            .append_query_results([[create_test_circle("c1", true)]])
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .into_connection();

        let service = service(db);
        service.join("bob", "c1").await.unwrap();

        let again = service.join("bob", "c1").await;
        assert!(matches!(again, Err(AppError::BadRequest(msg)) if msg == "Already a member"));
    }

    #[tokio::test]
    async fn test_join_missing_circle() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<circle::Model>::new()])
            .into_connection();

        let result = service(db).join("bob", "nope").await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Circle not found"));
    }

    #[tokio::test]
    async fn test_join_by_invitation_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_circle("c1", false)]])
            .append_query_results([Vec::<circle_member::Model>::new()])
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .append_query_results([[activity_row()]])
            .into_connection();

        let circle_id = service(db)
            .join_by_invitation_code("bob", "INVITE42")
            .await
            .unwrap();

        assert_eq!(circle_id, "c1");
    }

    #[tokio::test]
    async fn test_join_by_wrong_invitation_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<circle::Model>::new()])
            .into_connection();

        let result = service(db).join_by_invitation_code("bob", "WRONG000").await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Invalid invitation code"));
    }

    #[tokio::test]
    async fn test_owner_cannot_leave() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "alice", CircleRole::Owner)]])
            .into_connection();

        let result = service(db).leave("alice", "c1").await;
        assert!(
            matches!(result, Err(AppError::BadRequest(msg)) if msg.starts_with("Owner cannot leave"))
        );
    }

    #[tokio::test]
    async fn test_member_leaves() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[activity_row()]])
            .into_connection();

        service(db).leave("bob", "c1").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_member_requires_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .into_connection();

        let result = service(db).remove_member("bob", "c1", "carol").await;
        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "Only circle owner can remove members")
        );
    }

    #[tokio::test]
    async fn test_remove_member_cannot_remove_owner() {
        let owner = create_test_member("c1", "alice", CircleRole::Owner);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[owner.clone()]])
            .append_query_results([[owner]])
            .into_connection();

        let result = service(db).remove_member("alice", "c1", "alice").await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Cannot remove owner"));
    }

    #[tokio::test]
    async fn test_remove_missing_member() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "alice", CircleRole::Owner)]])
            .append_query_results([Vec::<circle_member::Model>::new()])
            .into_connection();

        let result = service(db).remove_member("alice", "c1", "ghost").await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Member not found"));
    }

    #[tokio::test]
    async fn test_add_member_by_email_not_implemented_for_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "alice", CircleRole::Owner)]])
            .into_connection();

        let result = service(db)
            .add_member_by_email("alice", "c1", "bob@example.com")
            .await;
        assert!(matches!(result, Err(AppError::NotImplemented(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete_are_owner_only() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .append_query_results([[create_test_member("c1", "bob", CircleRole::Member)]])
            .into_connection();

        let service = service(db);

        let update = service
            .update(
                "bob",
                UpdateCircleInput {
                    circle_id: "c1".to_string(),
                    name: Some("Renamed".to_string()),
                    description: None,
                },
            )
            .await;
        assert!(matches!(update, Err(AppError::Forbidden(msg)) if msg == "Only circle owner can update"));

        let delete = service.delete("bob", "c1").await;
        assert!(matches!(delete, Err(AppError::Forbidden(msg)) if msg == "Only circle owner can delete"));
    }

    #[tokio::test]
    async fn test_get_requires_membership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_circle("c1", true)]])
            .append_query_results([Vec::<circle_member::Model>::new()])
            .into_connection();

        let result = service(db).get("stranger", "c1").await;
        assert!(
            matches!(result, Err(AppError::Forbidden(msg)) if msg == "You are not a member of this circle")
        );
    }

    #[tokio::test]
    async fn test_list_public_attaches_member_counts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_circle("c1", true), create_test_circle("c2", true)]])
            .append_query_results([[maplit::btreemap! {
                "circle_id" => Value::from("c1"),
                "member_count" => Value::BigInt(Some(4)),
            }]])
            .into_connection();

        let circles = service(db).list_public().await.unwrap();

        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].member_count, 4);
        assert_eq!(circles[1].member_count, 0);
    }

    #[tokio::test]
    async fn test_list_mine_follows_membership_order() {
        let mut second = create_test_circle("c2", false);
        second.name = "Second".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                create_test_member("c2", "alice", CircleRole::Member),
                create_test_member("c1", "alice", CircleRole::Owner),
                create_test_member("gone", "alice", CircleRole::Member),
            ]])
            .append_query_results([[create_test_circle("c1", true), second]])
            .into_connection();

        let circles = service(db).list_mine("alice").await.unwrap();

        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].circle.id, "c2");
        assert_eq!(circles[0].circle.name, "Second");
        assert_eq!(circles[0].role, CircleRole::Member);
        assert_eq!(circles[1].circle.id, "c1");
        assert!(circles[1].role.is_owner());
    }
}
