//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use circles_common::{Config, StorageService};
use circles_core::{
    ActivityService, AdminService, AnnouncementService, CategoryService, CircleService,
    FileService, FileShareService, FolderService, PaymentService, SearchService, UserService,
};
use circles_db::repositories::{
    ActivityRepository, AdminLogRepository, AnnouncementRepository, CategoryRepository,
    CircleRepository, FileRepository, FileShareLinkRepository, FolderRepository,
    PaymentRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub circle_service: CircleService,
    pub file_service: FileService,
    pub folder_service: FolderService,
    pub search_service: SearchService,
    pub file_share_service: FileShareService,
    pub activity_service: ActivityService,
    pub category_service: CategoryService,
    pub admin_service: AdminService,
    pub announcement_service: AnnouncementService,
    pub payment_service: PaymentService,
}

impl AppState {
    /// Wire repositories and services around one database handle.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: StorageService, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let circle_repo = CircleRepository::new(Arc::clone(&db));
        let folder_repo = FolderRepository::new(Arc::clone(&db));
        let file_repo = FileRepository::new(Arc::clone(&db));
        let share_link_repo = FileShareLinkRepository::new(Arc::clone(&db));
        let activity_repo = ActivityRepository::new(Arc::clone(&db));
        let category_repo = CategoryRepository::new(Arc::clone(&db));
        let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
        let admin_log_repo = AdminLogRepository::new(Arc::clone(&db));
        let payment_repo = PaymentRepository::new(db);

        let activity_service =
            ActivityService::new(activity_repo, circle_repo.clone(), user_repo.clone());

        Self {
            user_service: UserService::new(user_repo.clone(), config.auth.owner_open_id.clone()),
            circle_service: CircleService::new(
                circle_repo.clone(),
                file_repo.clone(),
                user_repo.clone(),
                activity_service.clone(),
            ),
            file_service: FileService::new(
                file_repo.clone(),
                folder_repo.clone(),
                circle_repo.clone(),
                user_repo.clone(),
                activity_service.clone(),
                storage,
            ),
            folder_service: FolderService::new(
                folder_repo,
                file_repo.clone(),
                circle_repo.clone(),
                user_repo.clone(),
                activity_service.clone(),
            ),
            search_service: SearchService::new(circle_repo.clone(), category_repo.clone()),
            file_share_service: FileShareService::new(
                share_link_repo,
                file_repo.clone(),
                circle_repo.clone(),
            ),
            activity_service,
            category_service: CategoryService::new(category_repo, circle_repo),
            admin_service: AdminService::new(
                user_repo,
                admin_log_repo.clone(),
                payment_repo.clone(),
            ),
            announcement_service: AnnouncementService::new(announcement_repo, admin_log_repo),
            payment_service: PaymentService::new(payment_repo, file_repo),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to an active user and stores it
/// in the request extensions. Requests without a valid token pass through
/// anonymously; handlers decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(Authorization(bearer)) = req.headers().typed_get::<Authorization<Bearer>>() {
        match state.user_service.authenticate(bearer.token()).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Token lookup failed"),
        }
    }

    next.run(req).await
}
