pub mod auth;
pub mod client;

use anyhow::Result;
use futures_util::future::BoxFuture;
use serde_json::Value;

pub use auth::{BearerToken, Credentials, TokenProvider};
pub use client::{ResourceClient, ResourceConfig};

/// Id the model has to supply before a resource can be fetched.
#[derive(Debug, Clone, Copy)]
pub struct Requirement {
    pub param: &'static str,
    pub label: &'static str,
}

// ============================================================================
// MACRO DEFINITION
// ============================================================================

macro_rules! define_resources {
    (
        $(
            $variant:ident {
                api_type: $api_type:literal,
                description: $desc:literal,
                requires: $requires:expr,
            }
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ResourceKind {
            $($variant),*
        }

        impl ResourceKind {
            /// All resource kinds, root of the hierarchy first
            pub fn all() -> &'static [ResourceKind] {
                &[$(ResourceKind::$variant),*]
            }

            /// Parse the `apiType` value the model emits
            pub fn from_api_type(s: &str) -> Option<Self> {
                match s {
                    $($api_type => Some(ResourceKind::$variant),)*
                    _ => None,
                }
            }

            pub fn api_type(&self) -> &'static str {
                match self {
                    $(ResourceKind::$variant => $api_type),*
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(ResourceKind::$variant => $desc),*
                }
            }

            /// Parent id this kind is looked up by, if any
            pub fn requirement(&self) -> Option<Requirement> {
                match self {
                    $(ResourceKind::$variant => $requires),*
                }
            }
        }
    };
}

// ============================================================================
// RESOURCE HIERARCHY
// ============================================================================

define_resources! {
    Schools {
        api_type: "schools",
        description: "all schools in the system",
        requires: None,
    },
    Rooms {
        api_type: "rooms",
        description: "rooms of one school",
        requires: Some(Requirement { param: "school_uuid", label: "School UUID" }),
    },
    Sensors {
        api_type: "sensors",
        description: "sensors installed in one room",
        requires: Some(Requirement { param: "room_uuid", label: "Room UUID" }),
    },
    Values {
        api_type: "values",
        description: "latest reading of one sensor",
        requires: Some(Requirement { param: "sensor_uuid", label: "Sensor UUID" }),
    },
}

impl ResourceKind {
    pub fn missing_param_message(&self) -> Option<String> {
        self.requirement()
            .map(|req| format!("{} required for fetching {}", req.label, self.api_type()))
    }
}

/// The school → room → sensor → latest value API, as the assistant sees it.
pub trait ResourceApi: Send + Sync {
    fn fetch_schools(&self) -> BoxFuture<'_, Result<Value>>;
    fn fetch_rooms<'a>(&'a self, school_uuid: &'a str) -> BoxFuture<'a, Result<Value>>;
    fn fetch_sensors<'a>(&'a self, room_uuid: &'a str) -> BoxFuture<'a, Result<Value>>;
    fn fetch_sensor_value<'a>(&'a self, sensor_uuid: &'a str) -> BoxFuture<'a, Result<Value>>;
}
