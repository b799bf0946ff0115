use finapi_core::UserId;

/// Authenticated user for a request, taken from the token subject.
///
/// Present on every protected route. The user may no longer exist; services
/// decide what that means.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
