//! Database repositories.

mod comment;
mod follow;
mod group;
mod media_file;
mod post;
mod user;

pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use group::GroupRepository;
pub use media_file::MediaFileRepository;
pub use post::PostRepository;
pub use user::UserRepository;
