// Profile data model: the resolved profile URL and the enriched profile record
//
// The enrichment API returns a loosely-typed `person` object. It is first
// filtered (empty values and denylisted keys removed) and then read into
// `ProfileRecord`, whose known attributes are typed and optional. Fields the
// schema does not name are kept in `extra` so nothing reaches the summary
// prompt unfiltered and nothing useful is silently dropped.

pub mod fetcher;

use crate::error::Result;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

pub use fetcher::{FetchError, FetchMode, ProfileFetcher};

/// Path fragment every LinkedIn member profile URL contains
pub const PROFILE_PATH_PATTERN: &str = "linkedin.com/in/";

/// What the search tool reports when no profile URL matched
pub const PROFILE_NOT_FOUND: &str = "LinkedIn profile not found.";

/// Upstream fields never passed on, regardless of content
pub const DENYLISTED_FIELDS: &[&str] = &["certifications"];

fn profile_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[^\s"'<>()\[\]]+"#)
            .expect("static regex")
    })
}

/// Outcome of profile URL resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum ProfileUrl {
    Found(String),
    NotFound,
}

impl ProfileUrl {
    /// Interpret free text (an agent answer or a tool observation)
    ///
    /// The first LinkedIn member URL in the text wins. The not-found
    /// sentinel, or text without any profile URL, is `NotFound`.
    pub fn from_answer(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == PROFILE_NOT_FOUND {
            return ProfileUrl::NotFound;
        }

        match profile_url_re().find(text) {
            Some(m) => {
                let url = m.as_str().trim_end_matches(|c| c == '.' || c == ',');
                if url.starts_with("http") {
                    ProfileUrl::Found(url.to_string())
                } else {
                    ProfileUrl::Found(format!("https://{}", url))
                }
            }
            None => ProfileUrl::NotFound,
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            ProfileUrl::Found(url) => Some(url),
            ProfileUrl::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProfileUrl::Found(_))
    }
}

impl fmt::Display for ProfileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileUrl::Found(url) => f.write_str(url),
            ProfileUrl::NotFound => f.write_str(PROFILE_NOT_FOUND),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Drop empty, blank and null values plus denylisted keys
///
/// Idempotent: filtering an already filtered map returns it unchanged.
pub fn filter_person_fields(person: Map<String, Value>) -> Map<String, Value> {
    person
        .into_iter()
        .filter(|(key, value)| {
            !DENYLISTED_FIELDS.contains(&key.as_str()) && !is_empty_value(value)
        })
        .collect()
}

/// Month/year pair used by the enrichment API for dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<PartialDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PartialDate>,
}

/// One job in the position history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_end_date: Option<DateRange>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub position_history: Vec<Position>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One entry in the education history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_end_date: Option<DateRange>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educations_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education_history: Vec<Education>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Enriched profile of one person
///
/// Built with [`ProfileRecord::from_person`]; the filter has already run, so
/// every present attribute is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_identifier: Option<String>,
    #[serde(default, rename = "linkedInUrl", skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<PositionHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schools: Option<EducationHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Value>>,

    /// Any other non-empty upstream attribute, including typed attributes
    /// whose upstream shape did not match
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn fits<T: DeserializeOwned>(value: &Value) -> bool {
    T::deserialize(value).is_ok()
}

/// Upstream key of each typed attribute and whether a value has its shape
const TYPED_FIELDS: &[(&str, fn(&Value) -> bool)] = &[
    ("publicIdentifier", fits::<String>),
    ("linkedInUrl", fits::<String>),
    ("firstName", fits::<String>),
    ("lastName", fits::<String>),
    ("headline", fits::<String>),
    ("location", fits::<String>),
    ("summary", fits::<String>),
    ("photoUrl", fits::<String>),
    ("followerCount", fits::<u64>),
    ("connectionsCount", fits::<u64>),
    ("positions", fits::<PositionHistory>),
    ("schools", fits::<EducationHistory>),
    ("skills", fits::<Vec<Value>>),
    ("languages", fits::<Vec<Value>>),
];

impl ProfileRecord {
    /// Filter a raw `person` object and read it into the typed schema
    ///
    /// Never fails: a typed attribute whose upstream value has another shape
    /// (a `location` object, a `"21k"` follower count) is kept verbatim in
    /// `extra` under its original key.
    pub fn from_person(person: Map<String, Value>) -> Self {
        let mut typed = Map::new();
        let mut mismatched = BTreeMap::new();

        for (key, value) in filter_person_fields(person) {
            let shape_ok = TYPED_FIELDS
                .iter()
                .find(|(name, _)| *name == key)
                .map_or(true, |(_, check)| check(&value));
            if shape_ok {
                typed.insert(key, value);
            } else {
                debug!("Keeping '{}' untyped, its shape does not match", key);
                mismatched.insert(key, value);
            }
        }

        let mut record = match serde_json::from_value::<ProfileRecord>(Value::Object(typed.clone())) {
            Ok(record) => record,
            Err(e) => {
                warn!("Profile record kept untyped: {}", e);
                ProfileRecord {
                    extra: typed.into_iter().collect(),
                    ..ProfileRecord::default()
                }
            }
        };
        record.extra.extend(mismatched);
        record
    }

    /// True when no attribute survived filtering
    pub fn is_empty(&self) -> bool {
        *self == ProfileRecord::default()
    }

    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// JSON rendering embedded in the summary prompt
    pub fn to_prompt_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
