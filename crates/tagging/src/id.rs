//! Short identifiers for generated group names.

use uuid::Uuid;

const SHORT_ID_LEN: usize = 10;

/// Returns a short, printable, random identifier (lowercase hex).
///
/// Collisions are possible in principle and are not checked for.
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}
