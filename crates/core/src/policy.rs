//! Authorization policy: stateless predicates deciding whether a principal
//! may act on a resource.
//!
//! Handlers consult these before dispatching to the repositories, so the
//! ownership rule lives in exactly one place.

use crate::roles::Principal;
use crate::types::DbId;

/// Whether the principal may act on arbitrary reviews and comments
/// regardless of authorship.
pub fn can_moderate(principal: &Principal) -> bool {
    principal.is_moderator() || principal.is_admin()
}

/// Whether the principal may update or delete a resource owned by
/// `author_id`: the author themselves, a moderator, or an admin.
pub fn can_modify_resource(principal: &Principal, author_id: DbId) -> bool {
    principal.id == author_id || can_moderate(principal)
}
