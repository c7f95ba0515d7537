//! Repositories, one per aggregate.

mod activity;
mod admin_log;
mod announcement;
mod category;
mod circle;
mod file;
mod file_share_link;
mod folder;
mod payment;
mod user;

pub use activity::ActivityRepository;
pub use admin_log::AdminLogRepository;
pub use announcement::AnnouncementRepository;
pub use category::CategoryRepository;
pub use circle::CircleRepository;
pub use file::FileRepository;
pub use file_share_link::FileShareLinkRepository;
pub use folder::FolderRepository;
pub use payment::{PaymentRepository, earnings_month};
pub use user::UserRepository;
