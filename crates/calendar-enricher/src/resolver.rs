//! The seam to the conferencing detail resolver.

use async_trait::async_trait;
use cms_client::{CmsClient, JoinDetails};

/// A trait for resolving a user's personal conferencing room.
///
/// Implementations never raise: a missing room, incomplete detail data or a
/// failed lookup all come back as `None`, with the cause logged by the
/// implementation. The pipeline treats `None` as "nothing to enrich with".
#[async_trait]
pub trait RoomResolver: Send + Sync {
    /// Resolve join details for the given user identifier (the local part
    /// of the mailbox address).
    async fn resolve(&self, user_id: &str) -> Option<JoinDetails>;

    /// Get a human-readable name for this resolver implementation.
    fn name(&self) -> &str;
}

#[async_trait]
impl RoomResolver for CmsClient {
    async fn resolve(&self, user_id: &str) -> Option<JoinDetails> {
        self.resolve_personal_room(user_id).await
    }

    fn name(&self) -> &str {
        "CmsClient"
    }
}
