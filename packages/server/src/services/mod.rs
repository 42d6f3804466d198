pub mod identity;
pub mod moderation;
pub mod rating;

pub use identity::IdentityService;
pub use moderation::ModerationService;
pub use rating::RatingService;
