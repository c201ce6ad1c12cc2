use crate::utils::error::{RelayError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Smallest `limit` the form offers.
pub const LIMIT_MIN: i64 = 1;
/// Largest `limit` the form offers.
pub const LIMIT_MAX: i64 = 20;

/// Which brevet control times the upstream API should list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlList {
    ListAll,
    ListOpenOnly,
    ListCloseOnly,
}

impl ControlList {
    pub const ALL: [ControlList; 3] = [
        ControlList::ListAll,
        ControlList::ListOpenOnly,
        ControlList::ListCloseOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlList::ListAll => "listAll",
            ControlList::ListOpenOnly => "listOpenOnly",
            ControlList::ListCloseOnly => "listCloseOnly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlList::ListAll => "List All",
            ControlList::ListOpenOnly => "List Open Only",
            ControlList::ListCloseOnly => "List Close Only",
        }
    }
}

impl fmt::Display for ControlList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlList {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        ControlList::ALL
            .into_iter()
            .find(|list| list.as_str() == s)
            .ok_or_else(|| RelayError::InvalidParameter {
                name: "control_list".to_string(),
                value: s.to_string(),
                reason: "expected one of listAll, listOpenOnly, listCloseOnly".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| RelayError::InvalidParameter {
                name: "format".to_string(),
                value: s.to_string(),
                reason: "expected json or csv".to_string(),
            })
    }
}

/// Number of records requested from upstream, sent as `top`.
///
/// Any integer is accepted; the upstream API answers zero or negative
/// values with its own error document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limit(pub i64);

impl Limit {
    pub fn in_form_range(&self) -> bool {
        (LIMIT_MIN..=LIMIT_MAX).contains(&self.0)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Limit {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Limit)
            .map_err(|e| RelayError::InvalidParameter {
                name: "limit".to_string(),
                value: s.to_string(),
                reason: format!("expected an integer ({})", e),
            })
    }
}

/// How `limit` values outside the form's range are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitPolicy {
    /// Forward any integer to upstream untouched.
    #[default]
    Forward,
    /// Reject values outside `LIMIT_MIN..=LIMIT_MAX`.
    Enforce,
}

/// Form fields exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawQuery {
    pub control_list: Option<String>,
    pub format: Option<String>,
    pub limit: Option<String>,
}

impl RawQuery {
    /// True on the first page load, before the form was submitted.
    pub fn is_empty(&self) -> bool {
        self.control_list.is_none() && self.format.is_none() && self.limit.is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A validated relay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelayQuery {
    pub control_list: ControlList,
    pub format: OutputFormat,
    pub limit: Option<Limit>,
}

impl RelayQuery {
    pub fn new(control_list: ControlList, format: OutputFormat, limit: Option<Limit>) -> Self {
        Self {
            control_list,
            format,
            limit,
        }
    }

    pub fn parse(raw: &RawQuery, policy: LimitPolicy) -> Result<Self> {
        let control_list = non_blank(&raw.control_list)
            .ok_or_else(|| RelayError::MissingParameter {
                name: "control_list".to_string(),
            })?
            .parse::<ControlList>()?;

        let format = non_blank(&raw.format)
            .ok_or_else(|| RelayError::MissingParameter {
                name: "format".to_string(),
            })?
            .parse::<OutputFormat>()?;

        // Upstream lists every record when `top` is omitted
        let limit = non_blank(&raw.limit).map(str::parse::<Limit>).transpose()?;

        if let (Some(limit), LimitPolicy::Enforce) = (limit, policy) {
            if !limit.in_form_range() {
                return Err(RelayError::InvalidParameter {
                    name: "limit".to_string(),
                    value: limit.to_string(),
                    reason: format!("must be between {} and {}", LIMIT_MIN, LIMIT_MAX),
                });
            }
        }

        Ok(Self::new(control_list, format, limit))
    }
}

impl TryFrom<&RawQuery> for RelayQuery {
    type Error = RelayError;

    fn try_from(raw: &RawQuery) -> Result<Self> {
        RelayQuery::parse(raw, LimitPolicy::default())
    }
}

/// Body fetched from the upstream API for one relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// One CSV line ready for display.
///
/// `text` is what the page shows: the line as sent, except that a line made
/// of a single quoted field is shown unquoted. `fields` holds the parsed
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayRecord {
    pub text: String,
    pub fields: Vec<String>,
}

impl DisplayRecord {
    pub fn new(text: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            text: text.into(),
            fields,
        }
    }
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    /// Upstream JSON, byte for byte.
    Json(String),
    Csv(Vec<DisplayRecord>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(control_list: Option<&str>, format: Option<&str>, limit: Option<&str>) -> RawQuery {
        RawQuery {
            control_list: control_list.map(String::from),
            format: format.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_parse_complete_query() {
        let query = RelayQuery::parse(
            &raw(Some("listOpenOnly"), Some("json"), Some("5")),
            LimitPolicy::Forward,
        )
        .unwrap();

        assert_eq!(query.control_list, ControlList::ListOpenOnly);
        assert_eq!(query.format, OutputFormat::Json);
        assert_eq!(query.limit, Some(Limit(5)));
    }

    #[test]
    fn test_blank_limit_means_no_limit() {
        let query = RelayQuery::try_from(&raw(Some("listAll"), Some("csv"), Some(""))).unwrap();
        assert_eq!(query.limit, None);

        let query = RelayQuery::try_from(&raw(Some("listAll"), Some("csv"), None)).unwrap();
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_missing_control_list_is_reported() {
        let err = RelayQuery::try_from(&raw(None, Some("json"), Some("3"))).unwrap_err();
        assert!(matches!(err, RelayError::MissingParameter { ref name } if name == "control_list"));

        let err = RelayQuery::try_from(&raw(Some("listAll"), Some("  "), None)).unwrap_err();
        assert!(matches!(err, RelayError::MissingParameter { ref name } if name == "format"));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let err = RelayQuery::try_from(&raw(Some("../admin"), Some("json"), None)).unwrap_err();
        assert!(matches!(err, RelayError::InvalidParameter { ref name, .. } if name == "control_list"));

        let err = RelayQuery::try_from(&raw(Some("listAll"), Some("xml"), None)).unwrap_err();
        assert!(matches!(err, RelayError::InvalidParameter { ref name, .. } if name == "format"));

        let err = RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("ten"))).unwrap_err();
        assert!(matches!(err, RelayError::InvalidParameter { ref name, .. } if name == "limit"));

        let err = RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("2.5"))).unwrap_err();
        assert!(matches!(err, RelayError::InvalidParameter { ref name, .. } if name == "limit"));
    }

    #[test]
    fn test_out_of_range_limit_is_forwarded_by_default() {
        let query = RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("50"))).unwrap();
        assert_eq!(query.limit, Some(Limit(50)));

        let query = RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("0"))).unwrap();
        assert_eq!(query.limit, Some(Limit(0)));
    }

    #[test]
    fn test_negative_and_large_limits_are_forwarded_by_default() {
        let query = RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("-1"))).unwrap();
        assert_eq!(query.limit, Some(Limit(-1)));

        let query =
            RelayQuery::try_from(&raw(Some("listAll"), Some("json"), Some("5000000000"))).unwrap();
        assert_eq!(query.limit, Some(Limit(5_000_000_000)));
    }

    #[test]
    fn test_enforce_policy_rejects_out_of_range_limit() {
        let result = RelayQuery::parse(
            &raw(Some("listAll"), Some("json"), Some("21")),
            LimitPolicy::Enforce,
        );
        assert!(result.is_err());

        let result = RelayQuery::parse(
            &raw(Some("listAll"), Some("json"), Some("-1")),
            LimitPolicy::Enforce,
        );
        assert!(result.is_err());

        let query = RelayQuery::parse(
            &raw(Some("listAll"), Some("json"), Some("20")),
            LimitPolicy::Enforce,
        )
        .unwrap();
        assert_eq!(query.limit, Some(Limit(20)));
    }

    #[test]
    fn test_raw_query_is_empty_only_before_submit() {
        assert!(RawQuery::default().is_empty());
        assert!(!raw(None, None, Some("")).is_empty());
    }

    #[test]
    fn test_display_record_shows_text() {
        let record = DisplayRecord::new(
            "open_time, close_time",
            vec!["open_time".to_string(), " close_time".to_string()],
        );
        assert_eq!(record.to_string(), "open_time, close_time");
    }
}
