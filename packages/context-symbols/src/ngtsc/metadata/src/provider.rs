// Providers
//
// Provider entries of `providers` / `viewProviders` lists and of
// `@Injectable()` configurations.

use super::util::{describe, DiagnosticSite};
use crate::ngtsc::diagnostics::{Diagnostic, ErrorCode};
use crate::ngtsc::partial_evaluator::MetadataValue;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

const STRATEGY_KEYS: [&str; 4] = ["useClass", "useValue", "useExisting", "useFactory"];

/// How a provider produces its value.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStrategy {
    /// Class shorthand: the token is also the implementation.
    Class,
    UseClass(MetadataValue),
    UseValue(MetadataValue),
    UseExisting(MetadataValue),
    UseFactory {
        factory: MetadataValue,
        deps: Vec<MetadataValue>,
    },
}

impl ProviderStrategy {
    pub fn key(&self) -> &'static str {
        match self {
            ProviderStrategy::Class | ProviderStrategy::UseClass(_) => "useClass",
            ProviderStrategy::UseValue(_) => "useValue",
            ProviderStrategy::UseExisting(_) => "useExisting",
            ProviderStrategy::UseFactory { .. } => "useFactory",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDescriptor {
    pub token: MetadataValue,
    /// `None` when the provider names no strategy at all.
    pub strategy: Option<ProviderStrategy>,
    pub multi: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProviderDescriptor {
    /// The class shorthand provider for `token`.
    pub fn class(token: MetadataValue) -> Self {
        Self {
            token,
            strategy: Some(ProviderStrategy::Class),
            multi: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn use_value(&self) -> Option<&MetadataValue> {
        match &self.strategy {
            Some(ProviderStrategy::UseValue(value)) => Some(value),
            _ => None,
        }
    }

    /// Name of the token when it is a class or injection token reference.
    pub fn token_name(&self) -> Option<&str> {
        self.token.as_reference().map(|reference| reference.name())
    }

    /// Read a `{provide, useX, multi, deps}` object. The first strategy key in
    /// source order wins.
    pub fn from_object(
        object: &IndexMap<String, MetadataValue>,
        site: &DiagnosticSite<'_>,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let token = object.get("provide").cloned().unwrap_or(MetadataValue::Null);
        let strategy = read_strategy(object, site, &mut diagnostics);
        let multi = match object.get("multi") {
            None | Some(MetadataValue::Null) => false,
            Some(MetadataValue::Boolean(b)) => *b,
            Some(other) => {
                diagnostics.push(site.validation(
                    ErrorCode::ValueHasWrongType,
                    format!("multi of a provider in {} must be a boolean, got {}", site.owner, describe(other)),
                ));
                false
            }
        };
        Self {
            token,
            strategy,
            multi,
            diagnostics,
        }
    }
}

fn read_strategy(
    object: &IndexMap<String, MetadataValue>,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ProviderStrategy> {
    let present: SmallVec<[&str; 4]> = object
        .keys()
        .map(String::as_str)
        .filter(|key| STRATEGY_KEYS.contains(key))
        .collect();

    let Some((&first, rest)) = present.split_first() else {
        diagnostics.push(site.validation(
            ErrorCode::ProviderMissingStrategy,
            format!(
                "A provider in {} must specify one of {}",
                site.owner,
                STRATEGY_KEYS.join(", ")
            ),
        ));
        return None;
    };
    if !rest.is_empty() {
        diagnostics.push(site.validation(
            ErrorCode::ProviderStrategyConflict,
            format!(
                "A provider in {} specifies {} as well as {}; only {} is used",
                site.owner,
                first,
                rest.join(", "),
                first
            ),
        ));
    }

    let value = object.get(first).cloned().unwrap_or(MetadataValue::Null);
    Some(match first {
        "useClass" => ProviderStrategy::UseClass(value),
        "useValue" => ProviderStrategy::UseValue(value),
        "useExisting" => ProviderStrategy::UseExisting(value),
        _ => ProviderStrategy::UseFactory {
            factory: value,
            deps: object
                .get("deps")
                .map(|deps| deps.flatten().into_iter().cloned().collect())
                .unwrap_or_default(),
        },
    })
}

/// Provider descriptors of a flattened provider list. Entries that are not
/// providers are reported on `diagnostics` and skipped.
pub fn providers_from_entries(
    entries: &[MetadataValue],
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ProviderDescriptor> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            MetadataValue::Reference(_) => out.push(ProviderDescriptor::class(entry.clone())),
            MetadataValue::Object(object) => out.push(ProviderDescriptor::from_object(object, site)),
            // Already reported while reading the list.
            MetadataValue::Unresolvable(_) => {}
            other => diagnostics.push(site.validation(
                ErrorCode::ValueHasWrongType,
                format!(
                    "Providers of {} must be classes or provider objects, got {}",
                    site.owner,
                    describe(other)
                ),
            )),
        }
    }
    out
}

impl Serialize for ProviderDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("token", &self.token)?;
        match &self.strategy {
            Some(ProviderStrategy::Class) => map.serialize_entry("useClass", &self.token)?,
            Some(ProviderStrategy::UseClass(value)) => map.serialize_entry("useClass", value)?,
            Some(ProviderStrategy::UseValue(value)) => map.serialize_entry("useValue", value)?,
            Some(ProviderStrategy::UseExisting(value)) => map.serialize_entry("useExisting", value)?,
            Some(ProviderStrategy::UseFactory { factory, deps }) => {
                map.serialize_entry("useFactory", factory)?;
                map.serialize_entry("deps", deps)?;
            }
            None => {}
        }
        map.serialize_entry("multi", &self.multi)?;
        if !self.diagnostics.is_empty() {
            map.serialize_entry("diagnostics", &self.diagnostics)?;
        }
        map.end()
    }
}
