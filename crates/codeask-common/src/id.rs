use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one open UI session by the name its transport gives it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Use a caller-chosen name, e.g. the session tag of a transport envelope.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_named_keeps_name() {
        let sid = SessionId::named("sidebar");
        assert_eq!(sid.as_str(), "sidebar");
        assert_eq!(sid.to_string(), "sidebar");
        assert_eq!(sid, SessionId::named("sidebar"));
        assert_ne!(sid, SessionId::named("panel"));
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let sid = SessionId::named("main");
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, "\"main\"");
        let deserialized: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, deserialized);
    }
}
