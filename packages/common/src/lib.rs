pub mod category;
pub mod filter;
pub mod prompt_status;
pub mod rating;
pub mod role;
pub mod submission;
pub mod tags;

pub use category::Category;
pub use filter::PromptFilter;
pub use prompt_status::{Decision, PromptStatus};
pub use rating::RatingSummary;
pub use role::Role;
pub use submission::{SubmissionError, SubmissionForm, ValidSubmission};
pub use tags::TagSet;
