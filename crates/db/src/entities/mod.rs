//! Database entities.

pub mod comment;
pub mod follow;
pub mod group;
pub mod media_file;
pub mod post;
pub mod user;

pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use group::Entity as Group;
pub use media_file::Entity as MediaFile;
pub use post::Entity as Post;
pub use user::Entity as User;
