use serde::{Deserialize, Serialize};

/// How files enter and leave the tracked set.
///
/// The two lifecycles are exclusive: a store runs under exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingPolicy {
    /// Files are added from the active document; re-invoking on a tracked
    /// file removes it.
    #[default]
    Manual,
    /// The tracked set is repopulated wholesale from a workspace scan;
    /// entries are only checked and unchecked, never removed individually.
    Workspace,
}

impl TrackingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Workspace => "workspace",
        }
    }
}

impl std::str::FromStr for TrackingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "workspace" => Ok(Self::Workspace),
            other => Err(format!("unknown tracking policy '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_manual() {
        assert_eq!(TrackingPolicy::default(), TrackingPolicy::Manual);
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("manual".parse(), Ok(TrackingPolicy::Manual));
        assert_eq!("workspace".parse(), Ok(TrackingPolicy::Workspace));
        assert!("Manual".parse::<TrackingPolicy>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&TrackingPolicy::Workspace).unwrap();
        assert_eq!(json, "\"workspace\"");
        let parsed: TrackingPolicy = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(parsed, TrackingPolicy::Manual);
    }
}
