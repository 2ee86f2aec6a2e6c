//! Build metadata lookup
//!
//! Resolution order: JSON injected at runtime, then JSON embedded at compile
//! time through the `FLEET_BUILD_INFO` environment variable, then a default
//! whose `buildType` is `development`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Compile-time build metadata, if the build pipeline provided it
const PACKAGED_BUILD_INFO: Option<&str> = option_env!("FLEET_BUILD_INFO");

pub const DEFAULT_BUILD_TYPE: &str = "development";

/// Build metadata shown on the about screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub commit_hash: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub build_date: Option<String>,
    #[serde(default = "default_build_type")]
    pub build_type: String,
}

fn default_build_type() -> String {
    DEFAULT_BUILD_TYPE.to_string()
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            commit_hash: None,
            branch: None,
            build_date: None,
            build_type: default_build_type(),
        }
    }
}

impl BuildInfo {
    /// Resolve using the runtime JSON (if any) and the packaged metadata.
    pub fn resolve(runtime_json: Option<&str>) -> Self {
        Self::resolve_from(runtime_json, PACKAGED_BUILD_INFO)
    }

    /// First source that parses wins. Unparseable sources are skipped.
    pub fn resolve_from(runtime_json: Option<&str>, packaged_json: Option<&str>) -> Self {
        let sources = [("runtime", runtime_json), ("packaged", packaged_json)];

        for (source, json) in sources {
            let Some(json) = json.filter(|j| !j.trim().is_empty()) else {
                continue;
            };

            match serde_json::from_str::<BuildInfo>(json) {
                Ok(info) => {
                    debug!(source, build_type = %info.build_type, "Resolved build info");
                    return info;
                }
                Err(e) => warn!(source, error = %e, "Ignoring unreadable build info"),
            }
        }

        Self::default()
    }

    /// First seven characters of the commit hash
    pub fn short_commit(&self) -> Option<&str> {
        self.commit_hash
            .as_deref()
            .map(|hash| hash.get(..7).unwrap_or(hash))
    }

    pub fn is_development(&self) -> bool {
        self.build_type == DEFAULT_BUILD_TYPE
    }
}
