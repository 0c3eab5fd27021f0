use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route must contain at least one hop")]
    Empty,
}

/// Message route towards a content cluster, as a list of hops
/// (e.g. `"[Storage:cluster=music;clusterconfigid=music]"` or `"default"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route {
    hops: Vec<String>,
}

impl Route {
    pub fn hops(&self) -> &[String] { &self.hops }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hops: Vec<String> = s.split_whitespace().map(str::to_string).collect();
        if hops.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self { hops })
    }
}

impl TryFrom<String> for Route {
    type Error = RouteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hops.join(" "))
    }
}
