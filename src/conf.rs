use std::env;

pub const BIND_ENV: &str = "STREETLIGHT_BIND";
pub const MAP_ACCESS_TOKEN_ENV: &str = "MAP_ACCESS_TOKEN";

const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Deployment settings which can't live in the database. The map token is a
/// secret and must only ever come from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConf {
    pub bind: String,
    pub map_access_token: Option<String>,
}

impl EnvConf {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        EnvConf {
            bind: lookup(BIND_ENV)
                .filter(|it| !it.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND.into()),
            map_access_token: lookup(MAP_ACCESS_TOKEN_ENV).filter(|it| !it.trim().is_empty()),
        }
    }

    #[cfg(test)]
    pub fn mock() -> Self {
        EnvConf {
            bind: DEFAULT_BIND.into(),
            map_access_token: Some("pk.test".into()),
        }
    }
}
