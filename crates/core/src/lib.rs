//! Business logic layer for zine.
//!
//! Services own the domain rules (authorization, validation, denormalized
//! counters) and sit between the HTTP layer and the repositories.

pub mod services;

pub use services::comment::{CommentService, CommentWithAuthor, CreateCommentInput};
pub use services::follow::{FollowOutcome, FollowService};
pub use services::group::{CreateGroupInput, GroupService};
pub use services::media::MediaService;
pub use services::post::{CreatePostInput, PostService, PostWithAuthor, UpdatePostInput};
pub use services::user::{CreateUserInput, UserService};
