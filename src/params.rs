//! Resolution and merging of driver parameters.
//!
//! Both a class and a claim may point at a ConfigMap in the core API group.
//! The data of those ConfigMaps is merged into one environment map, class
//! first, so a claim can override any class default key by key.
use crate::spec::dra::{ResourceClaim, ResourceClass};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use strum_macros::Display;

pub const SUPPORTED_KIND: &str = "ConfigMap";

pub type Environment = BTreeMap<String, String>;

/// Parameters resolved for a class or a claim.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ParameterData {
    #[default]
    Absent,
    Map(Environment),
}

impl ParameterData {
    pub fn is_absent(&self) -> bool {
        matches!(self, ParameterData::Absent)
    }
}

impl From<Environment> for ParameterData {
    fn from(value: Environment) -> Self {
        ParameterData::Map(value)
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterScope {
    Class,
    Claim,
}

/// A reference to a parameter source with the namespace already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterReference {
    pub api_group: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ParameterReference {
    pub fn for_class(class: &ResourceClass) -> Option<Self> {
        class.parameters_ref.as_ref().map(|r| Self {
            api_group: r.api_group.clone().unwrap_or_default(),
            kind: r.kind.clone(),
            namespace: r.namespace.clone().unwrap_or_default(),
            name: r.name.clone(),
        })
    }

    pub fn for_claim(claim: &ResourceClaim) -> Option<Self> {
        claim.spec.parameters_ref.as_ref().map(|r| Self {
            api_group: r.api_group.clone().unwrap_or_default(),
            kind: r.kind.clone(),
            namespace: claim.namespace().to_string(),
            name: r.name.clone(),
        })
    }
}

impl Display for ParameterReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },
    #[error("failed to fetch {reference}: {message}")]
    Backend { reference: String, message: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ParameterError {
    #[error("unsupported {scope} parameters API group: {group}")]
    UnsupportedGroup { scope: ParameterScope, group: String },
    #[error("unsupported {scope} parameters kind: {kind}")]
    UnsupportedKind { scope: ParameterScope, kind: String },
    #[error("failed to get {scope} parameters: {source}")]
    Lookup {
        scope: ParameterScope,
        #[source]
        source: LookupError,
    },
}

/// Read access to ConfigMap data.
#[async_trait]
pub trait ParameterLookup: Send + Sync {
    async fn config_map_data(&self, namespace: &str, name: &str) -> Result<Environment, LookupError>;
}

/// Fetches the key/value data a reference points at. No reference means no
/// parameters. Unsupported references are rejected before any lookup is made.
pub async fn resolve_parameters(
    lookup: &dyn ParameterLookup,
    scope: ParameterScope,
    reference: Option<&ParameterReference>,
) -> Result<ParameterData, ParameterError> {
    let reference = match reference {
        None => return Ok(ParameterData::Absent),
        Some(r) => r,
    };

    if !reference.api_group.is_empty() {
        return Err(ParameterError::UnsupportedGroup {
            scope,
            group: reference.api_group.clone(),
        });
    }
    if reference.kind != SUPPORTED_KIND {
        return Err(ParameterError::UnsupportedKind {
            scope,
            kind: reference.kind.clone(),
        });
    }

    let data = lookup
        .config_map_data(&reference.namespace, &reference.name)
        .await
        .map_err(|source| ParameterError::Lookup { scope, source })?;

    Ok(ParameterData::Map(data))
}

/// Copies `src` into `dst`, overwriting existing keys. Absent data adds
/// nothing.
pub fn merge_into(src: &ParameterData, dst: &mut Environment) {
    if let ParameterData::Map(env) = src {
        dst.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// Class parameters overlaid with claim parameters.
pub fn merge(class: &ParameterData, claim: &ParameterData) -> Environment {
    let mut env = Environment::new();
    merge_into(class, &mut env);
    merge_into(claim, &mut env);
    env
}
