//! Public JSON shapes for every resource.
//!
//! Rows from `baja_db` never leave the API directly: each resource has a view
//! type here and a function that builds it. Instrument and Expert have two
//! views (list and detail); which one a handler returns is decided by
//! [`Shape::for_operation`](baja_core::access::Shape::for_operation).

use baja_core::media::{media_url, select_primary, MediaType};
use baja_core::types::{DbId, Timestamp};
use baja_db::models::category::Category;
use baja_db::models::contact::Contact;
use baja_db::models::expert::Expert;
use baja_db::models::instrument::Instrument;
use baja_db::models::learning::LearningContent;
use baja_db::models::media::Media;
use baja_db::models::tuner::TunerConfiguration;
use baja_db::models::tutorial::Tutorial;
use serde::Serialize;

use crate::config::MediaConfig;
use crate::extract::RequestOrigin;

// ---------------------------------------------------------------------------
// File URLs
// ---------------------------------------------------------------------------

/// Turns stored file paths into public URLs for one request.
#[derive(Debug, Clone, Copy)]
pub struct FileUrls<'a> {
    prefix: &'a str,
    origin: Option<&'a str>,
}

impl<'a> FileUrls<'a> {
    pub fn new(media: &'a MediaConfig, origin: &'a RequestOrigin) -> Self {
        Self {
            prefix: &media.url_prefix,
            origin: origin.as_deref(),
        }
    }

    pub fn url(&self, stored: &str) -> String {
        media_url(self.prefix, self.origin, stored)
    }

    /// Empty paths are treated as "no file".
    pub fn optional(&self, stored: Option<&str>) -> Option<String> {
        stored.filter(|s| !s.is_empty()).map(|s| self.url(s))
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
}

pub fn category_shape(row: Category) -> CategoryView {
    CategoryView {
        id: row.id,
        name: row.name,
        slug: row.slug,
        description: row.description,
    }
}

// ---------------------------------------------------------------------------
// Instrument
// ---------------------------------------------------------------------------

/// Flat instrument card; also the shape of every instrument write response.
#[derive(Debug, Serialize)]
pub struct InstrumentListView {
    pub id: DbId,
    pub name: String,
    /// Category name.
    pub category: String,
    pub region: String,
    pub image: Option<String>,
    pub description: String,
    pub is_featured: bool,
}

/// Expert as embedded in an instrument page.
#[derive(Debug, Serialize)]
pub struct ExpertSummary {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
    pub photo: Option<String>,
}

/// Full instrument page.
#[derive(Debug, Serialize)]
pub struct InstrumentDetailView {
    #[serde(flatten)]
    pub card: InstrumentListView,
    pub history: String,
    pub materials: String,
    pub playing_technique: String,
    pub cultural_significance: String,
    pub audio_sample: Option<String>,
    pub model_3d: Option<String>,
    pub media: Vec<MediaView>,
    pub experts: Vec<ExpertSummary>,
}

/// Either instrument shape, serialized without a wrapper.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InstrumentView {
    List(InstrumentListView),
    Detail(Box<InstrumentDetailView>),
}

pub fn instrument_list_shape(row: Instrument, urls: &FileUrls<'_>) -> InstrumentListView {
    InstrumentListView {
        id: row.id,
        image: urls.optional(row.primary_image.as_deref()),
        name: row.name,
        category: row.category_name,
        region: row.region,
        description: row.description,
        is_featured: row.is_featured,
    }
}

/// `audio_sample` and `model_3d` are the primary media of their type among
/// `media` (flagged primary first, then lowest id).
pub fn instrument_detail_shape(
    mut row: Instrument,
    media: Vec<Media>,
    experts: Vec<Expert>,
    urls: &FileUrls<'_>,
) -> InstrumentDetailView {
    let audio_sample = select_primary(&media, MediaType::Audio).map(|m| urls.url(&m.file));
    let model_3d = select_primary(&media, MediaType::Model3d).map(|m| urls.url(&m.file));

    let history = std::mem::take(&mut row.history);
    let materials = std::mem::take(&mut row.materials);
    let playing_technique = std::mem::take(&mut row.playing_technique);
    let cultural_significance = std::mem::take(&mut row.cultural_significance);

    InstrumentDetailView {
        card: instrument_list_shape(row, urls),
        history,
        materials,
        playing_technique,
        cultural_significance,
        audio_sample,
        model_3d,
        media: media.into_iter().map(|m| media_shape(m, urls)).collect(),
        experts: experts
            .into_iter()
            .map(|e| ExpertSummary {
                id: e.id,
                photo: urls.optional(e.photo.as_deref()),
                name: e.name,
                expertise: e.expertise,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct MediaView {
    pub id: DbId,
    pub instrument: DbId,
    pub media_type: String,
    pub file: String,
    pub title: String,
    pub is_primary: bool,
}

pub fn media_shape(row: Media, urls: &FileUrls<'_>) -> MediaView {
    MediaView {
        id: row.id,
        instrument: row.instrument_id,
        media_type: row.media_type,
        file: urls.url(&row.file),
        title: row.title,
        is_primary: row.is_primary,
    }
}

// ---------------------------------------------------------------------------
// Expert
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ExpertListView {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
    pub photo: Option<String>,
    pub bio: String,
    /// Instrument names, alphabetical.
    pub instruments: Vec<String>,
}

/// Instrument as embedded in an expert page.
#[derive(Debug, Serialize)]
pub struct InstrumentSummary {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub region: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpertDetailView {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
    pub photo: Option<String>,
    pub bio: String,
    pub detailed_bio: String,
    pub achievements: Vec<String>,
    pub contact_email: String,
    pub performance_video: Option<String>,
    pub teaching_audio: Option<String>,
    pub instruments: Vec<InstrumentSummary>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExpertView {
    List(ExpertListView),
    Detail(Box<ExpertDetailView>),
}

pub fn expert_list_shape(row: Expert, urls: &FileUrls<'_>) -> ExpertListView {
    ExpertListView {
        id: row.id,
        photo: urls.optional(row.photo.as_deref()),
        name: row.name,
        expertise: row.expertise,
        bio: row.bio,
        instruments: row.instrument_names,
    }
}

pub fn expert_detail_shape(
    row: Expert,
    instruments: Vec<Instrument>,
    urls: &FileUrls<'_>,
) -> ExpertDetailView {
    ExpertDetailView {
        id: row.id,
        photo: urls.optional(row.photo.as_deref()),
        performance_video: urls.optional(row.performance_video.as_deref()),
        teaching_audio: urls.optional(row.teaching_audio.as_deref()),
        name: row.name,
        expertise: row.expertise,
        bio: row.bio,
        detailed_bio: row.detailed_bio,
        achievements: row.achievements,
        contact_email: row.contact_email,
        instruments: instruments
            .into_iter()
            .map(|i| InstrumentSummary {
                id: i.id,
                image: urls.optional(i.primary_image.as_deref()),
                name: i.name,
                category: i.category_name,
                region: i.region,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Learning content, contact, tutorials, tuner
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LearningView {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub order: i32,
    pub is_published: bool,
}

pub fn learning_shape(row: LearningContent) -> LearningView {
    LearningView {
        id: row.id,
        title: row.title,
        content: row.content,
        order: row.order,
        is_published: row.is_published,
    }
}

#[derive(Debug, Serialize)]
pub struct ContactView {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

pub fn contact_shape(row: Contact) -> ContactView {
    ContactView {
        id: row.id,
        name: row.name,
        email: row.email,
        subject: row.subject,
        message: row.message,
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

#[derive(Debug, Serialize)]
pub struct TutorialView {
    pub id: DbId,
    pub instrument: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub instructor_name: String,
    pub duration: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub fn tutorial_shape(row: Tutorial) -> TutorialView {
    TutorialView {
        id: row.id,
        instrument: row.instrument_id,
        title: row.title,
        description: row.description,
        video_url: row.video_url,
        instructor_name: row.instructor_name,
        duration: row.duration,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[derive(Debug, Serialize)]
pub struct TunerView {
    pub id: DbId,
    pub instrument: DbId,
    pub tuning_name: String,
    pub notes: Vec<String>,
    pub frequencies: Vec<f64>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub fn tuner_shape(row: TunerConfiguration) -> TunerView {
    TunerView {
        id: row.id,
        instrument: row.instrument_id,
        tuning_name: row.tuning_name,
        notes: row.notes,
        frequencies: row.frequencies,
        is_default: row.is_default,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
