//! User business logic.
//!
//! All functions return [`PublicUser`] so the password hash never leaves the
//! service layer.

use crate::db::repository::FullRepository;
use crate::models::{NewUser, PublicUser, UserChanges, UserId};
use crate::services::{ServiceError, ServiceResult};

pub async fn list_users(repo: &dyn FullRepository) -> ServiceResult<Vec<PublicUser>> {
    let users = repo.list_users().await?;
    Ok(users.into_iter().map(Into::into).collect())
}

pub async fn get_user(repo: &dyn FullRepository, id: UserId) -> ServiceResult<PublicUser> {
    repo.get_user(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}

/// Create a user after checking email and username uniqueness.
///
/// The email check runs first, so a request colliding on both reports the
/// email conflict.
pub async fn create_user(repo: &dyn FullRepository, user: NewUser) -> ServiceResult<PublicUser> {
    if repo.find_user_by_email(&user.email).await?.is_some() {
        return Err(ServiceError::Validation("Email already exists".to_string()));
    }
    if repo.find_user_by_username(&user.username).await?.is_some() {
        return Err(ServiceError::Validation(
            "Username already exists".to_string(),
        ));
    }

    let created = repo.create_user(&user).await?;
    Ok(created.into())
}

pub async fn update_user(
    repo: &dyn FullRepository,
    id: UserId,
    changes: UserChanges,
) -> ServiceResult<PublicUser> {
    repo.update_user(id, &changes)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}

pub async fn delete_user(repo: &dyn FullRepository, id: UserId) -> ServiceResult<PublicUser> {
    repo.delete_user(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}
