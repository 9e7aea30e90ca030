//! Complaint records and the payloads used to submit, filter, triage,
//! and upvote them.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a complaint. Wire values match the backend exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Submitted,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    /// Every status in lifecycle order.
    pub const STEPS: [ComplaintStatus; 4] = [
        Self::Submitted,
        Self::Assigned,
        Self::InProgress,
        Self::Resolved,
    ];

    /// Parse a user-supplied status. Case, spaces, `-` and `_` are ignored,
    /// so `"in progress"`, `"In-Progress"` and `"in_progress"` all match.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        let folded: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "submitted" => Ok(Self::Submitted),
            "assigned" => Ok(Self::Assigned),
            "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(CoreError::Validation(format!(
                "Unknown status '{name}'. Must be one of: Submitted, Assigned, In Progress, Resolved"
            ))),
        }
    }

    /// Wire value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    /// Zero-based position in [`Self::STEPS`].
    pub fn step_index(self) -> usize {
        self as usize
    }

    /// Each lifecycle step paired with whether this status has reached it.
    pub fn timeline(self) -> Vec<(ComplaintStatus, bool)> {
        let reached = self.step_index();
        Self::STEPS
            .iter()
            .map(|step| (*step, step.step_index() <= reached))
            .collect()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Issue category a complaint is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Road,
    Waste,
    Water,
    Electricity,
    Streetlight,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Road,
        Self::Waste,
        Self::Water,
        Self::Electricity,
        Self::Streetlight,
        Self::Other,
    ];

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown category '{name}'. Must be one of: road, waste, water, electricity, streetlight, other"
                ))
            })
    }

    /// Wire value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Waste => "waste",
            Self::Water => "water",
            Self::Electricity => "electricity",
            Self::Streetlight => "streetlight",
            Self::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Road => "Road Issues",
            Self::Waste => "Waste Management",
            Self::Water => "Water Problems",
            Self::Electricity => "Electricity",
            Self::Streetlight => "Streetlight",
            Self::Other => "Other Issues",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Complaint record
// ---------------------------------------------------------------------------

/// Additional image uploaded with a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintImage {
    pub id: DbId,
    /// Absolute or server-relative URL of the stored image.
    pub image: String,
    #[serde(default)]
    pub uploaded_at: Option<Timestamp>,
}

/// A reported civic issue.
///
/// Detail, tracking, and public-feed responses carry every field; the
/// admin list view omits several, which then take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// Internal numeric id used in URLs.
    pub id: DbId,
    /// Human-readable identifier such as `HA-2025-001`.
    pub complaint_id: String,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub category_display: Option<String>,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: Option<f64>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<ComplaintImage>,
    /// Submission date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub upvote_count: i64,
    #[serde(default)]
    pub is_upvoted: bool,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl Complaint {
    /// First image to show for this complaint: the gallery wins over the
    /// legacy single-image column.
    pub fn cover_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(|img| img.image.as_str())
            .or(self.image.as_deref())
    }

    /// Category label, preferring the server-rendered one.
    pub fn category_label(&self) -> &str {
        self.category_display
            .as_deref()
            .unwrap_or_else(|| self.category.label())
    }

    /// Apply an upvote toggle result returned by the server.
    pub fn apply_upvote(&mut self, result: &UpvoteResult) {
        self.is_upvoted = result.upvoted;
        self.upvote_count = result.upvote_count;
    }
}

/// Decimal columns arrive either as JSON numbers or as decimal strings.
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Response to a successful submission: the stored complaint plus the
/// server's confirmation message.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedComplaint {
    #[serde(flatten)]
    pub complaint: Complaint,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of toggling an upvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpvoteResult {
    /// Whether the caller now upvotes the complaint.
    pub upvoted: bool,
    pub upvote_count: i64,
}

// ---------------------------------------------------------------------------
// Complaint code
// ---------------------------------------------------------------------------

/// A single URL path segment: no separators, dots, query or fragment
/// markers, escapes, or whitespace.
const COMPLAINT_CODE_PATTERN: &str = r"^[^/\\.?#%\s[:cntrl:]]+$";

static COMPLAINT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMPLAINT_CODE_PATTERN).expect("valid regex"));

/// Normalised human-readable complaint identifier used by public tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplaintCode(String);

impl ComplaintCode {
    /// Trim and upper-case `input`, rejecting anything that is not a
    /// single safe path segment. Unknown but well-formed codes are left for
    /// the backend to resolve.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let normalised = input.trim().to_ascii_uppercase();
        if normalised.is_empty() {
            return Err(CoreError::Validation("Complaint ID is required".into()));
        }
        if !COMPLAINT_CODE_RE.is_match(&normalised) {
            return Err(CoreError::Validation(format!(
                "Complaint ID '{}' must not contain '/', '.', '?', '#', '%' or spaces",
                input.trim()
            )));
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// An image file attached to a new complaint.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`. Guessed from the extension when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Explicit content type, or one inferred from the file extension.
    pub fn mime_type(&self) -> &str {
        if let Some(ct) = &self.content_type {
            return ct;
        }
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.mime_type())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A complaint about to be submitted.
#[derive(Debug, Clone, Validate)]
pub struct NewComplaint {
    pub category: Category,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 300, message = "location must be 1-300 characters"))]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub images: Vec<ImageAttachment>,
}

impl NewComplaint {
    pub fn new(
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            description: description.into(),
            location: location.into(),
            latitude: None,
            longitude: None,
            images: Vec::new(),
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.images.push(image);
        self
    }

    /// Validate field lengths and coordinates. Whitespace-only text fields
    /// count as empty.
    pub fn check(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} is required")));
            }
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(CoreError::Validation(
                        "latitude must be within [-90, 90]".into(),
                    ));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(CoreError::Validation(
                        "longitude must be within [-180, 180]".into(),
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(CoreError::Validation(
                    "latitude and longitude must be given together".into(),
                ));
            }
        }
        self.validate()?;
        Ok(())
    }

    /// Plain-text multipart fields in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("category", self.category.name().to_string()),
            ("title", self.title.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("location", self.location.trim().to_string()),
        ];
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            fields.push(("latitude", format!("{lat:.6}")));
            fields.push(("longitude", format!("{lon:.6}")));
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Public feed filters
// ---------------------------------------------------------------------------

/// Ordering of the public complaint feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSort {
    #[default]
    Recent,
    Oldest,
    MostUpvoted,
}

impl FeedSort {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            "most_upvoted" => Ok(Self::MostUpvoted),
            other => Err(CoreError::Validation(format!(
                "Unknown sort '{other}'. Must be one of: recent, oldest, most_upvoted"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Oldest => "oldest",
            Self::MostUpvoted => "most_upvoted",
        }
    }
}

/// Filters for `GET /complaints/public/`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub category: Option<Category>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ComplaintStatus>,
    pub sort: Option<FeedSort>,
}

impl FeedQuery {
    pub fn check(&self) -> Result<(), CoreError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::Validation(format!(
                    "date_from ({from}) must not be after date_to ({to})"
                )));
            }
        }
        Ok(())
    }

    /// Query-string pairs for the set filters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.name().to_string()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.name().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.name().to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Triage payloads
// ---------------------------------------------------------------------------

/// Body of `PATCH /complaints/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: ComplaintStatus,
}

/// Body of `POST /complaints/{id}/assign/`.
///
/// Each field is tri-state: `None` leaves it untouched, `Some(None)`
/// clears it, `Some(Some(id))` sets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_department: Option<Option<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<DbId>>,
}

impl Assignment {
    pub fn department(mut self, department_id: Option<DbId>) -> Self {
        self.assigned_department = Some(department_id);
        self
    }

    pub fn officer(mut self, user_id: Option<DbId>) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn check(&self) -> Result<(), CoreError> {
        if self.assigned_department.is_none() && self.assigned_to.is_none() {
            return Err(CoreError::Validation(
                "assignment must set or clear a department or an officer".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint_json() -> serde_json::Value {
        serde_json::json!({
            "id": 12,
            "complaint_id": "HA-2025-001",
            "title": "Pothole on Main Street",
            "category": "road",
            "category_display": "Road Issues",
            "description": "Large pothole near the intersection.",
            "location": "Main Street, Ward 5",
            "latitude": "27.700769",
            "longitude": 85.300140,
            "status": "In Progress",
            "image": null,
            "images": [{"id": 3, "image": "/media/complaint_images/a.jpg", "uploaded_at": "2025-02-10T08:00:00Z"}],
            "date": "2025-02-10",
            "created_at": "2025-02-10T07:59:00Z",
            "upvote_count": 4,
            "is_upvoted": true,
            "submitted_by": "alice"
        })
    }

    #[test]
    fn status_wire_values() {
        let s: ComplaintStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, ComplaintStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::Resolved).unwrap(),
            "\"Resolved\""
        );
    }

    #[test]
    fn status_from_name_is_lenient() {
        for input in ["in progress", "In-Progress", "in_progress", "INPROGRESS"] {
            assert_eq!(
                ComplaintStatus::from_name(input).unwrap(),
                ComplaintStatus::InProgress
            );
        }
        assert!(ComplaintStatus::from_name("closed").is_err());
    }

    #[test]
    fn timeline_marks_reached_steps() {
        let timeline = ComplaintStatus::Assigned.timeline();
        let reached: Vec<bool> = timeline.iter().map(|(_, done)| *done).collect();
        assert_eq!(reached, vec![true, true, false, false]);
        assert_eq!(timeline[2].0, ComplaintStatus::InProgress);
    }

    #[test]
    fn category_labels_and_parsing() {
        assert_eq!(Category::from_name("Water").unwrap(), Category::Water);
        assert_eq!(Category::Streetlight.label(), "Streetlight");
        assert!(Category::from_name("noise").is_err());
    }

    #[test]
    fn complaint_full_record() {
        let c: Complaint = serde_json::from_value(complaint_json()).unwrap();
        assert_eq!(c.complaint_id, "HA-2025-001");
        assert_eq!(c.status, ComplaintStatus::InProgress);
        assert_eq!(c.latitude, Some(27.700769));
        assert_eq!(c.longitude, Some(85.30014));
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2025, 2, 10));
        assert_eq!(c.cover_image(), Some("/media/complaint_images/a.jpg"));
        assert_eq!(c.upvote_count, 4);
    }

    #[test]
    fn complaint_list_view_defaults() {
        let json = serde_json::json!({
            "id": 1,
            "complaint_id": "HA-2025-002",
            "title": "Overflowing bin",
            "category": "waste",
            "category_display": "Waste Management",
            "location": "City Park",
            "status": "Assigned",
            "date": "2025-02-09"
        });
        let c: Complaint = serde_json::from_value(json).unwrap();
        assert_eq!(c.description, "");
        assert!(c.latitude.is_none());
        assert!(c.images.is_empty());
        assert_eq!(c.cover_image(), None);
        assert_eq!(c.category_label(), "Waste Management");
    }

    #[test]
    fn apply_upvote_updates_counts() {
        let mut c: Complaint = serde_json::from_value(complaint_json()).unwrap();
        c.apply_upvote(&UpvoteResult {
            upvoted: false,
            upvote_count: 3,
        });
        assert!(!c.is_upvoted);
        assert_eq!(c.upvote_count, 3);
    }

    #[test]
    fn submitted_complaint_carries_message() {
        let mut json = complaint_json();
        json["message"] = "Complaint submitted successfully".into();
        let parsed: SubmittedComplaint = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.complaint.complaint_id, "HA-2025-001");
        assert_eq!(
            parsed.message.as_deref(),
            Some("Complaint submitted successfully")
        );
    }

    #[test]
    fn complaint_code_normalises() {
        let code = ComplaintCode::parse("  ha-2025-001 ").unwrap();
        assert_eq!(code.as_str(), "HA-2025-001");
    }

    #[test]
    fn complaint_code_rejects_path_characters() {
        assert!(ComplaintCode::parse("").is_err());
        assert!(ComplaintCode::parse("   ").is_err());
        assert!(ComplaintCode::parse("HA/../admin").is_err());
        assert!(ComplaintCode::parse("HA 2025").is_err());
        assert!(ComplaintCode::parse("HA-2025-001?x=1").is_err());
        assert!(ComplaintCode::parse("HA%2F1").is_err());
    }

    #[test]
    fn complaint_code_keeps_unusual_but_safe_characters() {
        assert_eq!(ComplaintCode::parse("xyz_999").unwrap().as_str(), "XYZ_999");
        assert_eq!(ComplaintCode::parse("ha:1").unwrap().as_str(), "HA:1");
    }

    #[test]
    fn new_complaint_validation() {
        let ok = NewComplaint::new(Category::Road, "Pothole", "Deep hole", "Main St");
        assert!(ok.check().is_ok());

        let blank_title = NewComplaint::new(Category::Road, "   ", "Deep hole", "Main St");
        assert!(blank_title.check().is_err());

        let long_title = NewComplaint::new(Category::Road, "x".repeat(201), "d", "l");
        assert!(long_title.check().is_err());

        let mut half_coords = ok.clone();
        half_coords.latitude = Some(10.0);
        assert!(half_coords.check().is_err());

        let bad_coords = ok.with_coordinates(91.0, 0.0);
        assert!(bad_coords.check().is_err());
    }

    #[test]
    fn new_complaint_form_fields() {
        let c = NewComplaint::new(Category::Water, " Leak ", "Pipe burst", "Ward 3")
            .with_coordinates(27.7, 85.3);
        let fields = c.form_fields();
        assert_eq!(fields[0], ("category", "water".to_string()));
        assert_eq!(fields[1], ("title", "Leak".to_string()));
        assert!(fields.contains(&("latitude", "27.700000".to_string())));
        assert!(fields.contains(&("longitude", "85.300000".to_string())));
    }

    #[test]
    fn attachment_mime_inferred_from_extension() {
        assert_eq!(ImageAttachment::new("a.JPG", vec![]).mime_type(), "image/jpeg");
        assert_eq!(ImageAttachment::new("b.png", vec![]).mime_type(), "image/png");
        assert_eq!(
            ImageAttachment::new("c", vec![]).mime_type(),
            "application/octet-stream"
        );
        assert_eq!(
            ImageAttachment::new("c", vec![])
                .with_content_type("image/heic")
                .mime_type(),
            "image/heic"
        );
    }

    #[test]
    fn feed_query_pairs_skip_unset() {
        assert!(FeedQuery::default().to_pairs().is_empty());

        let q = FeedQuery {
            category: Some(Category::Road),
            date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
            sort: Some(FeedSort::MostUpvoted),
            ..Default::default()
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("category", "road".to_string()),
                ("date_from", "2025-01-01".to_string()),
                ("sort", "most_upvoted".to_string()),
            ]
        );
    }

    #[test]
    fn feed_query_rejects_inverted_range() {
        let q = FeedQuery {
            date_from: NaiveDate::from_ymd_opt(2025, 3, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 2, 1),
            ..Default::default()
        };
        assert!(q.check().is_err());
    }

    #[test]
    fn assignment_serialises_only_touched_fields() {
        let a = Assignment::default().department(Some(4));
        assert_eq!(
            serde_json::to_value(a).unwrap(),
            serde_json::json!({"assigned_department": 4})
        );

        let cleared = Assignment::default().officer(None);
        assert_eq!(
            serde_json::to_value(cleared).unwrap(),
            serde_json::json!({"assigned_to": null})
        );

        assert!(Assignment::default().check().is_err());
    }
}
