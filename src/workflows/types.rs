// Core types for the resource-center report workflow

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a resource-center record
///
/// The four known stages form a strict forward sequence:
/// `ENTERED -> VERIFIED -> FINANCE -> PAYMENT`. Any other string received
/// from the record store is preserved in [`RecordStatus::Unknown`] so it can
/// be surfaced as a data-integrity fault instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    /// Submitted by the resource center, awaiting verification
    Entered,
    /// Student count verified by an administrator
    Verified,
    /// Forwarded to finance
    Finance,
    /// Paid; terminal
    Payment,
    /// A status string this client does not recognise
    Unknown(String),
}

impl RecordStatus {
    /// The known stages in lifecycle order
    pub const KNOWN: [RecordStatus; 4] = [
        RecordStatus::Entered,
        RecordStatus::Verified,
        RecordStatus::Finance,
        RecordStatus::Payment,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Entered => "ENTERED",
            RecordStatus::Verified => "VERIFIED",
            RecordStatus::Finance => "FINANCE",
            RecordStatus::Payment => "PAYMENT",
            RecordStatus::Unknown(raw) => raw,
        }
    }

    /// Parse a user-supplied status name, case-insensitively.
    ///
    /// Returns `None` for anything outside the four known stages.
    pub fn parse_known(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        match RecordStatus::from(upper) {
            RecordStatus::Unknown(_) => None,
            known => Some(known),
        }
    }

    /// The stage that directly follows this one, if any
    pub fn next(&self) -> Option<RecordStatus> {
        match self {
            RecordStatus::Entered => Some(RecordStatus::Verified),
            RecordStatus::Verified => Some(RecordStatus::Finance),
            RecordStatus::Finance => Some(RecordStatus::Payment),
            RecordStatus::Payment | RecordStatus::Unknown(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Payment)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RecordStatus::Unknown(_))
    }

    /// Whether a record at this stage must carry a verified count
    pub fn requires_verified_count(&self) -> bool {
        matches!(
            self,
            RecordStatus::Verified | RecordStatus::Finance | RecordStatus::Payment
        )
    }

    /// Whether a record at this stage must carry a payment date
    pub fn requires_payment_date(&self) -> bool {
        matches!(self, RecordStatus::Payment)
    }
}

impl From<String> for RecordStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ENTERED" => RecordStatus::Entered,
            "VERIFIED" => RecordStatus::Verified,
            "FINANCE" => RecordStatus::Finance,
            "PAYMENT" => RecordStatus::Payment,
            _ => RecordStatus::Unknown(value),
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(value: &str) -> Self {
        RecordStatus::from(value.to_string())
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub id: u64,
    #[serde(default)]
    pub tech_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub course_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCenter {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default, rename = "type")]
    pub center_type: Option<String>,
}

/// A resource-center submission undergoing administrative review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u64,
    pub status: RecordStatus,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_count: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire_date"
    )]
    pub payment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(
        default,
        rename = "resourcecenter",
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_center: Option<ResourceCenter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_file_name: Option<String>,
}

/// Field invariants a record fetched from the store can break
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    NonPositiveStudentCount,
    VerifiedCountMissing,
    VerifiedCountUnexpected,
    NonPositiveVerifiedCount,
    PaymentDateMissing,
    PaymentDateUnexpected,
    UnknownStatus(String),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::NonPositiveStudentCount => write!(f, "student count is not positive"),
            InvariantViolation::VerifiedCountMissing => write!(f, "verified count missing for verified stage"),
            InvariantViolation::VerifiedCountUnexpected => write!(f, "verified count set before verification"),
            InvariantViolation::NonPositiveVerifiedCount => write!(f, "verified count is not positive"),
            InvariantViolation::PaymentDateMissing => write!(f, "payment date missing at PAYMENT"),
            InvariantViolation::PaymentDateUnexpected => write!(f, "payment date set before PAYMENT"),
            InvariantViolation::UnknownStatus(raw) => write!(f, "unknown status {raw:?}"),
        }
    }
}

impl Record {
    /// A freshly entered record with no descriptive fields
    pub fn new(id: u64, student_count: u32) -> Self {
        Self {
            id,
            status: RecordStatus::Entered,
            student_count,
            verified_count: None,
            payment_date: None,
            technology: None,
            course: None,
            resource_center: None,
            resources: None,
            package_id: None,
            pdf_file_name: None,
        }
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_verified_count(mut self, verified_count: u32) -> Self {
        self.verified_count = Some(verified_count);
        self
    }

    pub fn with_payment_date(mut self, payment_date: NaiveDate) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    pub fn tech_name(&self) -> Option<&str> {
        self.technology.as_ref()?.tech_name.as_deref()
    }

    pub fn course_name(&self) -> Option<&str> {
        self.course.as_ref()?.course_name.as_deref()
    }

    pub fn center_name(&self) -> Option<&str> {
        self.resource_center.as_ref()?.name.as_deref()
    }

    /// Check the per-stage field invariants.
    ///
    /// An empty result means the record is consistent with its status.
    pub fn invariant_violations(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if self.student_count == 0 {
            violations.push(InvariantViolation::NonPositiveStudentCount);
        }

        if let RecordStatus::Unknown(raw) = &self.status {
            violations.push(InvariantViolation::UnknownStatus(raw.clone()));
            return violations;
        }

        match (self.status.requires_verified_count(), self.verified_count) {
            (true, None) => violations.push(InvariantViolation::VerifiedCountMissing),
            (true, Some(0)) => violations.push(InvariantViolation::NonPositiveVerifiedCount),
            (false, Some(_)) => violations.push(InvariantViolation::VerifiedCountUnexpected),
            _ => {}
        }

        match (self.status.requires_payment_date(), self.payment_date) {
            (true, None) => violations.push(InvariantViolation::PaymentDateMissing),
            (false, Some(_)) => violations.push(InvariantViolation::PaymentDateUnexpected),
            _ => {}
        }

        violations
    }
}

/// What the caller must supply before a record can advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredInput {
    /// A positive verified student count (ENTERED -> VERIFIED)
    VerifiedCount,
    /// Nothing; the record can advance as-is (VERIFIED -> FINANCE)
    Nothing,
    /// A payment date no later than today (FINANCE -> PAYMENT)
    PaymentDate,
    /// The record is at PAYMENT; no transition exists
    Terminal,
}

impl RequiredInput {
    /// Short operator-facing prompt for the input
    pub fn prompt(&self) -> &'static str {
        match self {
            RequiredInput::VerifiedCount => "Please enter verified student count",
            RequiredInput::Nothing => "Ready to forward to finance",
            RequiredInput::PaymentDate => "Please select a payment date",
            RequiredInput::Terminal => "No further status change possible",
        }
    }
}

/// Caller-supplied payload for an advance
///
/// Count and date stay in their raw shapes (signed, unparsed); the engine
/// validates both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceInput {
    pub verified_count: Option<i64>,
    pub payment_date: Option<String>,
}

impl AdvanceInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn verified_count(count: i64) -> Self {
        Self {
            verified_count: Some(count),
            payment_date: None,
        }
    }

    pub fn payment_date(date: impl Into<String>) -> Self {
        Self {
            verified_count: None,
            payment_date: Some(date.into()),
        }
    }

    /// The status this input can only have been meant for.
    ///
    /// A verified count belongs to ENTERED and a payment date to FINANCE.
    /// Input carrying both, or neither, implies nothing.
    pub fn implied_from(&self) -> Option<RecordStatus> {
        match (&self.verified_count, &self.payment_date) {
            (Some(_), None) => Some(RecordStatus::Entered),
            (None, Some(_)) => Some(RecordStatus::Finance),
            _ => None,
        }
    }

    /// Build input from raw form text.
    ///
    /// Count text that is not an integer becomes `0`, which the engine rejects
    /// as a missing count.
    pub fn from_form(verified_count: Option<&str>, payment_date: Option<&str>) -> Self {
        let verified_count = verified_count.map(|text| text.trim().parse::<i64>().unwrap_or(0));
        let payment_date = payment_date
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Self {
            verified_count,
            payment_date,
        }
    }
}

/// Result of validating an advance against the record store's current copy
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The transition must be sent to the store
    Apply(Record),
    /// The store already holds the target status; nothing to send
    AlreadyApplied(Record),
}

impl Advance {
    pub fn record(&self) -> &Record {
        match self {
            Advance::Apply(record) | Advance::AlreadyApplied(record) => record,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            Advance::Apply(record) | Advance::AlreadyApplied(record) => record,
        }
    }

    pub fn needs_persist(&self) -> bool {
        matches!(self, Advance::Apply(_))
    }
}

/// The `{newStatus, verifiedCount?, paymentDate?}` payload sent to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub new_status: RecordStatus,
    pub verified_count: Option<u32>,
    pub payment_date: Option<NaiveDate>,
}

impl TransitionRequest {
    /// Derive the request from a proposed record.
    ///
    /// The verified count only accompanies the move to VERIFIED and the
    /// payment date only the move to PAYMENT.
    pub fn from_proposed(record: &Record) -> Self {
        let verified_count = match record.status {
            RecordStatus::Verified => record.verified_count,
            _ => None,
        };
        let payment_date = match record.status {
            RecordStatus::Payment => record.payment_date,
            _ => None,
        };
        Self {
            new_status: record.status.clone(),
            verified_count,
            payment_date,
        }
    }

    /// Query-string pairs in the order the backend expects
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("newStatus", self.new_status.to_string())];
        if let Some(count) = self.verified_count {
            pairs.push(("verifiedCount", count.to_string()));
        }
        if let Some(date) = self.payment_date {
            pairs.push(("paymentDate", wire_date::to_midnight_utc(date)));
        }
        pairs
    }
}

/// Lenient calendar-date handling for the backend's date fields.
///
/// The backend stores payment dates as date-times; only the calendar part is
/// meaningful here, so both `2025-08-12` and `2025-08-12T00:00:00.000Z` parse.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        let date_part = match trimmed.len() {
            10 => trimmed,
            len if len > 10 && trimmed.as_bytes()[10] == b'T' => trimmed.get(..10)?,
            _ => return None,
        };
        NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
    }

    pub fn to_midnight_utc(date: NaiveDate) -> String {
        format!("{}T00:00:00.000Z", date.format(DATE_FORMAT))
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date {text:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing_preserves_unknown_values() {
        assert_eq!(RecordStatus::from("FINANCE"), RecordStatus::Finance);
        assert_eq!(
            RecordStatus::from("ARCHIVED"),
            RecordStatus::Unknown("ARCHIVED".to_string())
        );
        assert_eq!(RecordStatus::parse_known("verified"), Some(RecordStatus::Verified));
        assert_eq!(RecordStatus::parse_known("archived"), None);
    }

    #[test]
    fn test_status_sequence() {
        assert_eq!(RecordStatus::Entered.next(), Some(RecordStatus::Verified));
        assert_eq!(RecordStatus::Finance.next(), Some(RecordStatus::Payment));
        assert_eq!(RecordStatus::Payment.next(), None);
        assert!(RecordStatus::Payment.is_terminal());
        assert_eq!(RecordStatus::Unknown("X".into()).next(), None);
    }

    #[test]
    fn test_record_deserializes_backend_shape() {
        let payload = json!({
            "id": 12,
            "technology": { "id": 1, "techName": "Rust" },
            "resources": "Lab",
            "course": { "id": 3, "courseName": "Systems" },
            "packageId": "PKG-12",
            "studentCount": 40,
            "verifiedCount": 38,
            "pdfFileName": "report-12.pdf",
            "status": "PAYMENT",
            "paymentDate": "2025-08-12T00:00:00",
            "resourcecenter": { "id": 5, "name": "North", "technology": "Rust", "type": "Lab" }
        });

        let record: Record = serde_json::from_value(payload).unwrap();

        assert_eq!(record.status, RecordStatus::Payment);
        assert_eq!(record.verified_count, Some(38));
        assert_eq!(record.payment_date, NaiveDate::from_ymd_opt(2025, 8, 12));
        assert_eq!(record.tech_name(), Some("Rust"));
        assert_eq!(record.center_name(), Some("North"));
        assert_eq!(
            record.resource_center.as_ref().and_then(|c| c.center_type.as_deref()),
            Some("Lab")
        );
        assert!(record.invariant_violations().is_empty());
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "status": "ENTERED",
            "studentCount": 30,
            "paymentDate": null
        }))
        .unwrap();

        assert_eq!(record, Record::new(7, 30));
    }

    #[test]
    fn test_invariant_violations() {
        let missing_count = Record::new(1, 10).with_status(RecordStatus::Finance);
        assert_eq!(
            missing_count.invariant_violations(),
            vec![InvariantViolation::VerifiedCountMissing]
        );

        let early_date = Record::new(2, 10)
            .with_status(RecordStatus::Verified)
            .with_verified_count(9)
            .with_payment_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(
            early_date.invariant_violations(),
            vec![InvariantViolation::PaymentDateUnexpected]
        );

        let unknown = Record::new(3, 10).with_status(RecordStatus::from("ARCHIVED"));
        assert_eq!(
            unknown.invariant_violations(),
            vec![InvariantViolation::UnknownStatus("ARCHIVED".to_string())]
        );
    }

    #[test]
    fn test_form_input_maps_non_numeric_count_to_zero() {
        assert_eq!(
            AdvanceInput::from_form(Some("abc"), None).verified_count,
            Some(0)
        );
        assert_eq!(
            AdvanceInput::from_form(Some(" 28 "), None).verified_count,
            Some(28)
        );
        assert_eq!(AdvanceInput::from_form(None, Some("  ")).payment_date, None);
    }

    #[test]
    fn test_input_implies_starting_status() {
        assert_eq!(
            AdvanceInput::verified_count(28).implied_from(),
            Some(RecordStatus::Entered)
        );
        assert_eq!(
            AdvanceInput::verified_count(0).implied_from(),
            Some(RecordStatus::Entered)
        );
        assert_eq!(
            AdvanceInput::payment_date("2025-08-01").implied_from(),
            Some(RecordStatus::Finance)
        );
        assert_eq!(AdvanceInput::none().implied_from(), None);
        assert_eq!(
            AdvanceInput::from_form(Some("5"), Some("2025-08-01")).implied_from(),
            None
        );
    }

    #[test]
    fn test_transition_request_query_pairs() {
        let verified = Record::new(7, 30)
            .with_status(RecordStatus::Verified)
            .with_verified_count(28);
        assert_eq!(
            TransitionRequest::from_proposed(&verified).query_pairs(),
            vec![
                ("newStatus", "VERIFIED".to_string()),
                ("verifiedCount", "28".to_string())
            ]
        );

        let finance = verified.clone().with_status(RecordStatus::Finance);
        assert_eq!(
            TransitionRequest::from_proposed(&finance).query_pairs(),
            vec![("newStatus", "FINANCE".to_string())]
        );

        let paid = finance
            .with_status(RecordStatus::Payment)
            .with_payment_date(NaiveDate::from_ymd_opt(2025, 8, 12).unwrap());
        assert_eq!(
            TransitionRequest::from_proposed(&paid).query_pairs(),
            vec![
                ("newStatus", "PAYMENT".to_string()),
                ("paymentDate", "2025-08-12T00:00:00.000Z".to_string())
            ]
        );
    }

    #[test]
    fn test_wire_date_parse() {
        assert_eq!(wire_date::parse("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(
            wire_date::parse("2025-08-12T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 8, 12)
        );
        assert_eq!(wire_date::parse("2023-02-29"), None);
        assert_eq!(wire_date::parse("12/08/2025"), None);
        assert_eq!(wire_date::parse("2025-08-12 10:00"), None);
    }
}
