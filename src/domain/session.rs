use std::fmt;

use crate::utils::validation::is_valid_session_id;

/// Identifier of one upload batch.
///
/// A session has no record of its own: it exists while its namespace
/// directories exist, and disappears when the reclaimer sweeps them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 128 random bits as lowercase hex, safe as both a path and URL segment.
    pub fn generate() -> Self {
        SessionId(format!("{:032x}", rand::random::<u128>()))
    }

    /// Accepts client-supplied ids that form a single safe path segment.
    pub fn parse(id: &str) -> Option<Self> {
        is_valid_session_id(id).then(|| SessionId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fresh unique stored name for an accepted upload; the client's extension is dropped.
pub fn generate_filename() -> String {
    format!("{}.png", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_do_not_collide() {
        let ids: HashSet<SessionId> = (0..10_000).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn generated_ids_round_trip_through_parse() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn parse_rejects_traversal() {
        assert!(SessionId::parse("..").is_none());
        assert!(SessionId::parse("../outputs").is_none());
    }

    #[test]
    fn generated_filenames_use_png_extension() {
        let name = generate_filename();
        assert!(name.ends_with(".png"));
        assert!(crate::utils::validation::is_valid_filename(&name));
        assert_ne!(name, generate_filename());
    }
}
