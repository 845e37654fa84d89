use uuid::Uuid;

/// Principal attached to an authenticated request.
///
/// The access middleware verifies the bearer token and stores this in the
/// request extensions; handlers only ever see this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
}

impl AuthCtx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
