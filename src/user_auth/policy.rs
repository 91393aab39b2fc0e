//! Ownership/role authorization for mutating book operations.

use super::token::Identity;
use crate::error::AppError;

/// Admins may mutate anything; everyone else only what they own.
pub fn can_mutate(identity: &Identity, resource_owner_id: i64) -> bool {
    identity.is_admin() || identity.user_id == resource_owner_id
}

/// `can_mutate` as a `Result`, logging denials.
pub fn authorize_mutation(
    identity: &Identity,
    resource_owner_id: i64,
    resource_id: i64,
) -> Result<(), AppError> {
    if can_mutate(identity, resource_owner_id) {
        return Ok(());
    }
    tracing::warn!(
        user_id = identity.user_id,
        owner_id = resource_owner_id,
        resource_id,
        "forbidden mutation attempt"
    );
    Err(AppError::Forbidden)
}

/// Owner recorded on a newly created resource. Always the caller,
/// whatever owner the request payload claimed.
pub fn owner_for_new_resource(identity: &Identity) -> i64 {
    identity.user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_auth::models::Role;

    fn identity(user_id: i64, role: Role) -> Identity {
        Identity {
            user_id,
            name: format!("user{user_id}"),
            email: format!("user{user_id}@x.com"),
            role,
        }
    }

    #[test]
    fn test_owner_can_mutate() {
        assert!(can_mutate(&identity(1, Role::User), 1));
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        assert!(!can_mutate(&identity(2, Role::User), 1));
        assert!(matches!(
            authorize_mutation(&identity(2, Role::User), 1, 10),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_can_mutate_anything() {
        assert!(can_mutate(&identity(99, Role::Admin), 1));
        assert!(authorize_mutation(&identity(99, Role::Admin), 1, 10).is_ok());
    }

    #[test]
    fn test_new_resource_owned_by_caller() {
        assert_eq!(owner_for_new_resource(&identity(7, Role::User)), 7);
        assert_eq!(owner_for_new_resource(&identity(8, Role::Admin)), 8);
    }
}
