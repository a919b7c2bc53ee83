//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_log_repo;
pub mod article_repo;
pub mod badge_repo;
pub mod contact_repo;
pub mod email_repo;
pub mod formation_repo;
pub mod milestone_repo;
pub mod notification_repo;
pub mod podcast_repo;
pub mod point_repo;
pub mod referral_repo;
pub mod satisfaction_repo;
pub mod session_repo;
pub mod timeline_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use article_repo::ArticleRepo;
pub use badge_repo::BadgeRepo;
pub use contact_repo::ContactRepo;
pub use email_repo::{EmailQueueRepo, EmailTemplateRepo};
pub use formation_repo::{FormationRepo, FormationSessionRepo};
pub use milestone_repo::MilestoneRepo;
pub use notification_repo::NotificationRepo;
pub use podcast_repo::PodcastRepo;
pub use point_repo::PointRepo;
pub use referral_repo::ReferralRepo;
pub use satisfaction_repo::SatisfactionRepo;
pub use session_repo::SessionRepo;
pub use timeline_repo::TimelineRepo;
pub use user_repo::UserRepo;
