mod response;
mod user;

pub use response::ApiResponse;
pub use user::{CreateUser, UpdateUser, User, UserId, UserInput};
