//! Domain entities - the core business objects.

mod comment;
mod like;
mod post;
mod user;

pub use comment::Comment;
pub use like::Like;
pub use post::{Post, PostWithLikes};
pub use user::User;
