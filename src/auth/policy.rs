use crate::{courses::repo_types::Course, error::ApiError, users::repo_types::User};

/// A resource with an owning user.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for Course {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

pub fn is_owner<R: Owned + ?Sized>(resource: &R, user: &User) -> bool {
    resource.owner_id() == user.id
}

/// `Forbidden` with `message` unless `user` owns `resource`.
pub fn ensure_owner<R: Owned + ?Sized>(
    resource: &R,
    user: &User,
    message: &str,
) -> Result<(), ApiError> {
    if is_owner(resource, user) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(message.to_string()))
    }
}
