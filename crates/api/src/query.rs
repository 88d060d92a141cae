//! Shared query parameter types for list endpoints.
//!
//! Every list endpoint accepts the same raw parameter bag. Values are kept
//! as strings so a malformed filter is ignored instead of rejecting the
//! request, and each resource picks the filters it understands.

use baja_core::query::{non_blank, parse_bool_filter, parse_id_filter};
use baja_db::filter::ListQuery;
use baja_db::models::contact::ContactFilter;
use baja_db::models::expert::ExpertFilter;
use baja_db::models::instrument::InstrumentFilter;
use baja_db::models::learning::LearningFilter;
use baja_db::models::media::MediaFilter;
use baja_db::models::tuner::TunerFilter;
use baja_db::models::tutorial::TutorialFilter;
use serde::Deserialize;

/// `?search=&ordering=&limit=&offset=` plus every resource filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,

    pub category: Option<String>,
    pub region: Option<String>,
    pub is_featured: Option<String>,
    pub instrument: Option<String>,
    pub media_type: Option<String>,
    pub is_primary: Option<String>,
    pub is_published: Option<String>,
    pub is_read: Option<String>,
    pub is_default: Option<String>,
}

impl ListParams {
    /// Search, ordering and page window. Limits are clamped in the repository layer.
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            search: non_blank(self.search.as_deref()).map(str::to_string),
            ordering: non_blank(self.ordering.as_deref()).map(str::to_string),
            limit: parse_id_filter(self.limit.as_deref()),
            offset: parse_id_filter(self.offset.as_deref()),
        }
    }

    pub fn instrument_filter(&self) -> InstrumentFilter {
        InstrumentFilter {
            category: text(self.category.as_deref()),
            region: text(self.region.as_deref()),
            is_featured: parse_bool_filter(self.is_featured.as_deref()),
        }
    }

    pub fn media_filter(&self) -> MediaFilter {
        MediaFilter {
            instrument: parse_id_filter(self.instrument.as_deref()),
            media_type: text(self.media_type.as_deref()),
            is_primary: parse_bool_filter(self.is_primary.as_deref()),
        }
    }

    pub fn expert_filter(&self) -> ExpertFilter {
        ExpertFilter {
            instrument: parse_id_filter(self.instrument.as_deref()),
        }
    }

    pub fn learning_filter(&self) -> LearningFilter {
        LearningFilter {
            is_published: parse_bool_filter(self.is_published.as_deref()),
        }
    }

    pub fn contact_filter(&self) -> ContactFilter {
        ContactFilter {
            is_read: parse_bool_filter(self.is_read.as_deref()),
        }
    }

    pub fn tutorial_filter(&self) -> TutorialFilter {
        TutorialFilter {
            instrument: parse_id_filter(self.instrument.as_deref()),
        }
    }

    pub fn tuner_filter(&self) -> TunerFilter {
        TunerFilter {
            instrument: parse_id_filter(self.instrument.as_deref()),
            is_default: parse_bool_filter(self.is_default.as_deref()),
        }
    }
}

fn text(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_values_are_ignored() {
        let params = ListParams {
            limit: Some("lots".into()),
            instrument: Some("abc".into()),
            is_featured: Some("perhaps".into()),
            category: Some("  ".into()),
            ..Default::default()
        };
        let query = params.list_query();
        assert_eq!(query.limit, None);

        let instruments = params.instrument_filter();
        assert_eq!(instruments.is_featured, None);
        assert_eq!(instruments.category, None);
        assert_eq!(params.media_filter().instrument, None);
    }

    #[test]
    fn filters_are_parsed() {
        let params = ListParams {
            search: Some(" madal ".into()),
            offset: Some("20".into()),
            instrument: Some("4".into()),
            is_default: Some("false".into()),
            ..Default::default()
        };
        let query = params.list_query();
        assert_eq!(query.search.as_deref(), Some("madal"));
        assert_eq!(query.offset, Some(20));

        let tuner = params.tuner_filter();
        assert_eq!(tuner.instrument, Some(4));
        assert_eq!(tuner.is_default, Some(false));
    }
}
