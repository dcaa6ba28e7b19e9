//! Exam records and their on-disk representation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Composite identity of an exam
///
/// Two records denote the same exam iff position, agency and year are equal
/// under exact string comparison. No case folding, trimming or accent
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExamKey {
    pub position: String,
    pub agency: String,
    pub year: String,
}

impl ExamKey {
    pub fn new(
        position: impl Into<String>,
        agency: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            position: position.into(),
            agency: agency.into(),
            year: year.into(),
        }
    }

    fn matches(&self, reference: &ExamReference) -> bool {
        self.position == reference.position
            && self.agency == reference.agency
            && self.year == reference.year
    }
}

/// Formats as `position - agency - year`, the key of the URL index export
impl fmt::Display for ExamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.position, self.agency, self.year)
    }
}

/// One row of a role listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamReference {
    /// Role/title as shown for this exam
    pub position: String,

    /// Hiring organization
    pub agency: String,

    /// Exam year, free text as scraped
    pub year: String,

    /// Examining board
    pub organizer: String,

    /// Education level
    pub level: String,

    /// Absolute URL of the exam's detail page
    pub detail_url: String,

    /// Display name of the catalog target that listed this exam
    pub source_category: String,
}

impl ExamReference {
    pub fn key(&self) -> ExamKey {
        ExamKey::new(
            self.position.clone(),
            self.agency.clone(),
            self.year.clone(),
        )
    }
}

/// Whether the detail page of an exam has been looked at
///
/// Persisted as the presence of the `PdfUrls` array: absent means
/// `Unresolved`, an empty array means `ResolvedEmpty`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    /// Seen on a listing page only; the detail page still has to be visited
    #[default]
    Unresolved,

    /// Detail page visited, no document links found
    ResolvedEmpty,

    /// Detail page visited, these document URLs found (non-empty, deduplicated)
    ResolvedWithDocuments(Vec<String>),
}

impl DocumentStatus {
    /// Builds a resolved status from extracted URLs
    pub fn resolved(urls: Vec<String>) -> Self {
        if urls.is_empty() {
            Self::ResolvedEmpty
        } else {
            Self::ResolvedWithDocuments(urls)
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// Document URLs, empty unless `ResolvedWithDocuments`
    pub fn urls(&self) -> &[String] {
        match self {
            Self::ResolvedWithDocuments(urls) => urls,
            _ => &[],
        }
    }

    fn from_wire(urls: Option<Vec<String>>) -> Self {
        match urls {
            None => Self::Unresolved,
            Some(urls) => Self::resolved(urls),
        }
    }

    fn into_wire(self) -> Option<Vec<String>> {
        match self {
            Self::Unresolved => None,
            Self::ResolvedEmpty => Some(Vec::new()),
            Self::ResolvedWithDocuments(urls) => Some(urls),
        }
    }
}

/// The persisted, merged entity for one exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredExam", into = "StoredExam")]
pub struct ExamRecord {
    pub reference: ExamReference,
    pub documents: DocumentStatus,

    /// Keys found on disk that this crate does not interpret, written back untouched
    pub extra: Map<String, Value>,
}

impl ExamRecord {
    pub fn new(reference: ExamReference, documents: DocumentStatus) -> Self {
        Self {
            reference,
            documents,
            extra: Map::new(),
        }
    }

    pub fn key(&self) -> ExamKey {
        self.reference.key()
    }

    pub fn has_key(&self, key: &ExamKey) -> bool {
        key.matches(&self.reference)
    }

    pub fn is_resolved(&self) -> bool {
        self.documents.is_resolved()
    }

    /// Copies the listing fields of `reference` onto this record
    ///
    /// Documents are left untouched. Returns true if any field changed.
    pub fn merge_reference(&mut self, reference: &ExamReference) -> bool {
        if self.reference == *reference {
            return false;
        }
        self.reference = reference.clone();
        true
    }
}

/// JSON layout of one dataset element
#[derive(Serialize, Deserialize)]
struct StoredExam {
    #[serde(default)]
    position: String,
    #[serde(default)]
    agency: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    organizer: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "cargo_source", default)]
    source_category: String,
    #[serde(rename = "sourceCategory", default, skip_serializing)]
    legacy_source_category: Option<String>,
    #[serde(rename = "PdfUrls", default, skip_serializing_if = "Option::is_none")]
    pdf_urls: Option<Vec<String>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredExam> for ExamRecord {
    fn from(stored: StoredExam) -> Self {
        let source_category = if stored.source_category.is_empty() {
            stored.legacy_source_category.unwrap_or_default()
        } else {
            stored.source_category
        };
        Self {
            reference: ExamReference {
                position: stored.position,
                agency: stored.agency,
                year: stored.year,
                organizer: stored.organizer,
                level: stored.level,
                detail_url: stored.url,
                source_category,
            },
            documents: DocumentStatus::from_wire(stored.pdf_urls),
            extra: stored.extra,
        }
    }
}

impl From<ExamRecord> for StoredExam {
    fn from(record: ExamRecord) -> Self {
        let ExamRecord {
            reference,
            documents,
            extra,
        } = record;
        Self {
            position: reference.position,
            agency: reference.agency,
            year: reference.year,
            organizer: reference.organizer,
            level: reference.level,
            url: reference.detail_url,
            source_category: reference.source_category,
            legacy_source_category: None,
            pdf_urls: documents.into_wire(),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ExamReference {
        ExamReference {
            position: "Enfermeiro".to_string(),
            agency: "Prefeitura X".to_string(),
            year: "2020".to_string(),
            organizer: "Banca Y".to_string(),
            level: "Superior".to_string(),
            detail_url: "https://site/exam/1".to_string(),
            source_category: "Enfermeiro".to_string(),
        }
    }

    #[test]
    fn test_key_is_exact() {
        let a = ExamKey::new("Enfermeiro", "Prefeitura X", "2020");
        let b = ExamKey::new("enfermeiro", "Prefeitura X", "2020");
        let c = ExamKey::new("Enfermeiro ", "Prefeitura X", "2020");
        assert_eq!(a, reference().key());
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(
            reference().key().to_string(),
            "Enfermeiro - Prefeitura X - 2020"
        );
    }

    #[test]
    fn test_resolved_status_from_urls() {
        assert_eq!(DocumentStatus::resolved(vec![]), DocumentStatus::ResolvedEmpty);
        assert!(DocumentStatus::ResolvedEmpty.is_resolved());
        assert!(!DocumentStatus::Unresolved.is_resolved());
        assert_eq!(
            DocumentStatus::resolved(vec!["a".to_string()]).urls(),
            &["a".to_string()]
        );
    }

    #[test]
    fn test_serialize_unresolved_omits_pdf_urls() {
        let record = ExamRecord::new(reference(), DocumentStatus::Unresolved);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("PdfUrls").is_none());
        assert_eq!(json["url"], "https://site/exam/1");
        assert_eq!(json["cargo_source"], "Enfermeiro");
    }

    #[test]
    fn test_serialize_resolved_empty_keeps_pdf_urls() {
        let record = ExamRecord::new(reference(), DocumentStatus::ResolvedEmpty);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["PdfUrls"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_array_survives_reload() {
        let record = ExamRecord::new(reference(), DocumentStatus::ResolvedEmpty);
        let text = serde_json::to_string(&record).unwrap();
        let back: ExamRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back.documents, DocumentStatus::ResolvedEmpty);
    }

    #[test]
    fn test_deserialize_legacy_shapes() {
        let text = r#"{
            "position": "Vigia",
            "agency": "Câmara",
            "year": "2019",
            "url": "https://site/exam/9",
            "sourceCategory": "Vigia",
            "notes": {"checked": true}
        }"#;
        let record: ExamRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.reference.source_category, "Vigia");
        assert_eq!(record.reference.organizer, "");
        assert_eq!(record.documents, DocumentStatus::Unresolved);
        assert_eq!(record.extra["notes"]["checked"], true);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["cargo_source"], "Vigia");
        assert_eq!(json["notes"]["checked"], true);
    }

    #[test]
    fn test_deserialize_both_category_keys() {
        let text = r#"[
            {"position": "A", "agency": "B", "year": "2020",
             "cargo_source": "X", "sourceCategory": "Y", "PdfUrls": []},
            {"position": "C", "agency": "D", "year": "2021",
             "cargo_source": "", "sourceCategory": "Z"}
        ]"#;
        let records: Vec<ExamRecord> = serde_json::from_str(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reference.source_category, "X");
        assert_eq!(records[0].documents, DocumentStatus::ResolvedEmpty);
        assert_eq!(records[1].reference.source_category, "Z");

        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["cargo_source"], "X");
        assert!(json.get("sourceCategory").is_none());
    }

    #[test]
    fn test_merge_reference_leaves_documents() {
        let mut record = ExamRecord::new(
            reference(),
            DocumentStatus::ResolvedWithDocuments(vec!["https://site/a.pdf".to_string()]),
        );
        let mut updated = reference();
        updated.level = "Médio".to_string();

        assert!(record.merge_reference(&updated));
        assert_eq!(record.reference.level, "Médio");
        assert_eq!(record.documents.urls().len(), 1);
        assert!(!record.merge_reference(&updated));
    }
}
