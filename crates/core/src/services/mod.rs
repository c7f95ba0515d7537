//! Business logic services.

#![allow(missing_docs)]

mod access;

pub mod activity;
pub mod admin;
pub mod announcement;
pub mod category;
pub mod circle;
pub mod file;
pub mod file_share;
pub mod folder;
pub mod payment;
pub mod search;
pub mod user;

pub use activity::{ActivityResponse, ActivityService};
pub use admin::{AdminLogResponse, AdminService, PageInput, PlatformEarningsResponse};
pub use announcement::{AnnouncementResponse, AnnouncementService, CreateAnnouncementInput};
pub use category::{CategoryInput, CategoryService};
pub use circle::{
    CircleDetailResponse, CircleResponse, CircleService, CreateCircleInput, MemberResponse,
    MyCircleResponse, PublicCircleResponse, UpdateCircleInput,
};
pub use file::{
    FileResponse, FileService, MAX_PRICE_CENTS, MyUploadResponse, SetPriceInput, UploadFileInput,
    UploadedFile,
};
pub use file_share::{
    CreateShareLinkInput, FileShareService, ShareLinkCreated, ShareLinkResponse,
    SharedFileResponse,
};
pub use folder::{CreateFolderInput, FolderResponse, FolderService, RenameFolderInput};
pub use payment::{
    CompleteOrderInput, CreateOrderInput, EarningsResponse, OrderCreated, OrderResponse,
    PaymentService, split_amount,
};
pub use search::{SearchByCategoryInput, SearchCirclesInput, SearchService};
pub use user::{IdentityInput, UserResponse, UserService};
