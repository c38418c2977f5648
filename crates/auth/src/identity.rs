//! Authenticated identity and the capabilities derived from its role claim

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default namespace of the custom role claim
pub const DEFAULT_ROLES_CLAIM: &str = "https://hola/roles";

/// A role name recognised in the role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    /// The string the identity provider puts in the claim array
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Client => "CLIENTE",
        }
    }

    /// Parse a claim value. Unknown names are ignored by returning `None`.
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "CLIENTE" => Some(Self::Client),
            _ => None,
        }
    }
}

/// Two independent capabilities read from the role claim.
///
/// There is no hierarchy between them: an administrator is only a client
/// when the claim lists both roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub admin: bool,
    pub client: bool,
}

impl Capabilities {
    /// The empty capability set, used for anonymous viewers and malformed claims
    pub fn none() -> Self {
        Self::default()
    }

    /// Decode the capability set from a raw claim value.
    ///
    /// Anything that is not an array yields the empty set; non-string
    /// elements inside the array are skipped.
    pub fn from_claim(value: Option<&Value>) -> Self {
        let mut caps = Self::none();
        let Some(Value::Array(items)) = value else {
            return caps;
        };

        for role in items.iter().filter_map(Value::as_str).filter_map(Role::from_claim) {
            match role {
                Role::Admin => caps.admin = true,
                Role::Client => caps.client = true,
            }
        }

        caps
    }

    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::Client => self.client,
        }
    }

    /// Whether either capability is present
    pub fn any(&self) -> bool {
        self.admin || self.client
    }
}

/// Profile claims of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject identifier, e.g. `google-oauth2|1234`
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    #[serde(default)]
    pub email_verified: bool,

    /// Every other claim, including the namespaced role claim
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl Identity {
    pub fn new(sub: &str) -> Self {
        Self {
            sub: sub.to_string(),
            email: None,
            name: None,
            nickname: None,
            picture: None,
            email_verified: false,
            custom: Map::new(),
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    /// Set the role claim under `claim` to the given roles
    pub fn with_roles(mut self, claim: &str, roles: &[Role]) -> Self {
        let values = roles
            .iter()
            .map(|r| Value::String(r.as_str().to_string()))
            .collect();
        self.custom.insert(claim.to_string(), Value::Array(values));
        self
    }

    /// Capabilities carried by the role claim under `claim`
    pub fn capabilities(&self, claim: &str) -> Capabilities {
        Capabilities::from_claim(self.custom.get(claim))
    }

    /// Upstream provider: the `sub` prefix before `|`, the whole `sub` when
    /// there is no separator, `Auth0` when that is empty
    pub fn provider(&self) -> &str {
        let provider = self.sub.split('|').next().unwrap_or_default();
        if provider.is_empty() {
            "Auth0"
        } else {
            provider
        }
    }
}
