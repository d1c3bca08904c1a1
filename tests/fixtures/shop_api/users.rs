use crate::models::User;

/// @Summary Fetch the name of one user
/// @Param id path int true "User id"
/// @Success 200 {object} NullString
/// @Failure 404 "User not found"
/// @Router /users/{id}/name [get]
pub async fn user_name(id: i64) -> Option<String> {
    None
}

/// @Summary Create a user
/// @Param user body User
/// @Param email form string true "Email address"
/// @Accept json
/// @Success 201 {object} User
/// @Router /users [post]
pub async fn create_user() -> User {
    User { id: 1, email: String::new() }
}

/// Plain helper without annotations.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// @Summary Annotated but never routed
pub fn orphan() {}
