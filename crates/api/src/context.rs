use dutyroster_auth::AuthenticatedUser;

/// Authenticated user for a request.
///
/// Inserted by the auth middleware; present for every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user: AuthenticatedUser,
}

impl AuthContext {
    pub fn new(user: AuthenticatedUser) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
