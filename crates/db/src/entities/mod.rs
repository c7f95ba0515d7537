//! Database entities.

pub mod admin_log;
pub mod announcement;
pub mod circle;
pub mod circle_activity_log;
pub mod circle_category;
pub mod circle_member;
pub mod file;
pub mod file_share_link;
pub mod folder;
pub mod payment_order;
pub mod platform_earnings;
pub mod user;
pub mod user_earnings;

pub use admin_log::Entity as AdminLog;
pub use announcement::Entity as Announcement;
pub use circle::Entity as Circle;
pub use circle_activity_log::Entity as CircleActivityLog;
pub use circle_category::Entity as CircleCategory;
pub use circle_member::Entity as CircleMember;
pub use file::Entity as File;
pub use file_share_link::Entity as FileShareLink;
pub use folder::Entity as Folder;
pub use payment_order::Entity as PaymentOrder;
pub use platform_earnings::Entity as PlatformEarnings;
pub use user::Entity as User;
pub use user_earnings::Entity as UserEarnings;
