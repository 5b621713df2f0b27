//! Boundary to the collaborators that decode model output into fields.
//!
//! Decoding GRIB or NetCDF files is not done here. A data source is anything that can answer a
//! [`Request`] with fields; the operators in this crate never talk to a data source themselves.
use crate::{
    error::{AnalysisError, Result},
    field::Field,
};
use itertools::Itertools;
use std::{collections::BTreeMap, fmt::Display};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};
use tracing::debug;

/// Key value pairs in the MARS request language, e.g. `param=T`, `levtype=ml`.
pub type RequestKeys = BTreeMap<String, String>;

/// A request for fields from a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// All fields of a parameter, by short name.
    Param(String),
    /// All fields of a parameter on one level type.
    ParamLevel {
        /// Parameter short name.
        param: String,
        /// Level type, e.g. `"ml"` for model levels.
        levtype: String,
    },
    /// Arbitrary request keys.
    Keys(RequestKeys),
}

impl Request {
    /// Merge this request over the default keys in `template`.
    ///
    /// Keys given in the request take precedence over the template.
    pub fn resolve(&self, template: &RequestKeys) -> RequestKeys {
        let mut keys = template.clone();
        match self {
            Request::Param(param) => {
                keys.insert("param".to_owned(), param.clone());
            }
            Request::ParamLevel { param, levtype } => {
                keys.insert("param".to_owned(), param.clone());
                keys.insert("levtype".to_owned(), levtype.clone());
            }
            Request::Keys(request) => {
                keys.extend(request.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        keys
    }
}

impl From<&str> for Request {
    fn from(param: &str) -> Self {
        Request::Param(param.to_owned())
    }
}

impl From<(&str, &str)> for Request {
    fn from((param, levtype): (&str, &str)) -> Self {
        Request::ParamLevel {
            param: param.to_owned(),
            levtype: levtype.to_owned(),
        }
    }
}

impl From<RequestKeys> for Request {
    fn from(keys: RequestKeys) -> Self {
        Request::Keys(keys)
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", format_keys(&self.resolve(&RequestKeys::new())))
    }
}

fn format_keys(keys: &RequestKeys) -> String {
    keys.iter().map(|(k, v)| format!("{}={}", k, v)).join(",")
}

/// Which set of GRIB definitions the decoder should use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, StrumDisplay, EnumIter,
)]
pub enum GribDefinitions {
    /// The definitions shipped with the GRIB library.
    #[strum(serialize = "vendor")]
    Vendor,
    /// The definitions of the COSMO consortium, needed for COSMO and ICON local parameters.
    #[strum(serialize = "cosmo")]
    Cosmo,
}

impl GribDefinitions {
    /// Look up GRIB definitions by name, `"vendor"` or `"cosmo"`.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| AnalysisError::UnsupportedMode(name.to_owned()))
    }
}

impl Default for GribDefinitions {
    fn default() -> Self {
        GribDefinitions::Cosmo
    }
}

/// Configuration of a data source, passed to its constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceConfig {
    /// GRIB definitions used while decoding.
    pub grib_definitions: GribDefinitions,
    /// Default request keys, overridden by the keys of each request.
    pub request_template: RequestKeys,
}

impl SourceConfig {
    /// Builder method to set the GRIB definitions.
    pub fn with_grib_definitions(self, grib_definitions: GribDefinitions) -> Self {
        SourceConfig {
            grib_definitions,
            ..self
        }
    }

    /// Builder method to add a default request key.
    pub fn with_template_key<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request_template.insert(key.into(), value.into());
        self
    }
}

/// Anything that can answer requests with fields.
pub trait FieldSource {
    /// All fields matching the request, `FieldNotFound` if there are none.
    fn retrieve(&self, request: &Request) -> Result<Vec<Field>>;
}

/// A data source holding fields that were already decoded.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    config: SourceConfig,
    fields: Vec<(RequestKeys, Field)>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new(config: SourceConfig) -> Self {
        MemorySource {
            config,
            fields: vec![],
        }
    }

    /// Builder method to add a field, described by its request keys.
    pub fn with_field(mut self, keys: RequestKeys, field: Field) -> Self {
        self.insert(keys, field);
        self
    }

    /// Add a field, described by its request keys.
    pub fn insert(&mut self, keys: RequestKeys, field: Field) {
        self.fields.push((keys, field));
    }

    /// The configuration of this source.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl FieldSource for MemorySource {
    fn retrieve(&self, request: &Request) -> Result<Vec<Field>> {
        let resolved = request.resolve(&self.config.request_template);
        debug!(
            request = format_keys(&resolved).as_str(),
            grib_definitions = self.config.grib_definitions.as_ref(),
            "retrieve"
        );

        let found: Vec<Field> = self
            .fields
            .iter()
            .filter(|(keys, _)| resolved.iter().all(|(k, v)| keys.get(k) == Some(v)))
            .map(|(_, field)| field.clone())
            .collect();

        if found.is_empty() {
            Err(AnalysisError::FieldNotFound(format_keys(&resolved)))
        } else {
            Ok(found)
        }
    }
}
