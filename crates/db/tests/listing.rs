//! Integration tests for list filtering, search, ordering and paging.

use baja_db::filter::ListQuery;
use baja_db::models::category::CreateCategory;
use baja_db::models::contact::{ContactFilter, CreateContact};
use baja_db::models::instrument::{CreateInstrument, InstrumentFilter};
use baja_db::models::learning::{CreateLearningContent, LearningFilter};
use baja_db::models::media::MediaFilter;
use baja_db::repositories::media_repo::NewMedia;
use baja_db::repositories::{
    CategoryRepo, ContactRepo, InstrumentRepo, LearningRepo, MediaRepo,
};
use sqlx::PgPool;

async fn category(pool: &PgPool, name: &str, slug: &str) -> i64 {
    let input = CreateCategory {
        name: name.into(),
        slug: None,
        description: String::new(),
    };
    CategoryRepo::create(pool, &input, slug).await.unwrap().id
}

async fn instrument(pool: &PgPool, category_id: i64, name: &str, region: &str, featured: bool) -> i64 {
    let input = CreateInstrument {
        name: name.into(),
        category: String::new(),
        region: region.into(),
        description: format!("The {name}"),
        image: None,
        is_featured: Some(featured),
        history: None,
        materials: Some(if name == "Madal" { "goat hide".into() } else { "wood".into() }),
        playing_technique: None,
        cultural_significance: None,
    };
    InstrumentRepo::create(pool, category_id, &input).await.unwrap().id
}

fn names(rows: &[baja_db::models::instrument::Instrument]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_instrument_filters_and_search(pool: PgPool) {
    let percussion = category(&pool, "Percussion", "percussion").await;
    let strings = category(&pool, "Strings", "strings").await;
    instrument(&pool, percussion, "Madal", "Hills", true).await;
    instrument(&pool, percussion, "Dhime", "Kathmandu Valley", false).await;
    instrument(&pool, strings, "Sarangi", "Hills", true).await;

    let q = ListQuery::default();

    let by_category = InstrumentRepo::list(
        &pool,
        &InstrumentFilter {
            category: Some("PERCUSSION".into()),
            ..Default::default()
        },
        &q,
    )
    .await
    .unwrap();
    assert_eq!(names(&by_category), vec!["Dhime", "Madal"]);

    let by_region = InstrumentRepo::list(
        &pool,
        &InstrumentFilter {
            region: Some("hills".into()),
            is_featured: Some(true),
            ..Default::default()
        },
        &q,
    )
    .await
    .unwrap();
    assert_eq!(names(&by_region), vec!["Madal", "Sarangi"]);

    let searched = InstrumentRepo::list(
        &pool,
        &InstrumentFilter::default(),
        &ListQuery {
            search: Some("HIDE".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(names(&searched), vec!["Madal"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_instrument_ordering_and_paging(pool: PgPool) {
    let c = category(&pool, "Percussion", "percussion").await;
    instrument(&pool, c, "Madal", "Hills", false).await;
    instrument(&pool, c, "Dhime", "Valley", false).await;
    instrument(&pool, c, "Tabla", "Terai", false).await;

    let desc = InstrumentRepo::list(
        &pool,
        &InstrumentFilter::default(),
        &ListQuery {
            ordering: Some("-name".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(names(&desc), vec!["Tabla", "Madal", "Dhime"]);

    let unknown_field = InstrumentRepo::list(
        &pool,
        &InstrumentFilter::default(),
        &ListQuery {
            ordering: Some("password".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(names(&unknown_field), vec!["Dhime", "Madal", "Tabla"]);

    let page = InstrumentRepo::list(
        &pool,
        &InstrumentFilter::default(),
        &ListQuery {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(names(&page), vec!["Madal"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_escapes_like_wildcards(pool: PgPool) {
    let c = category(&pool, "Percussion", "percussion").await;
    instrument(&pool, c, "Madal", "Hills", false).await;

    let rows = InstrumentRepo::list(
        &pool,
        &InstrumentFilter::default(),
        &ListQuery {
            search: Some("%".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(rows.is_empty(), "a bare % must not match everything");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_learning_default_order(pool: PgPool) {
    for (title, order) in [("Rhythm", 2), ("Basics", 1), ("Anatomy", 2), ("Scales", 0)] {
        LearningRepo::create(
            &pool,
            &CreateLearningContent {
                title: title.into(),
                content: "...".into(),
                order,
                is_published: None,
            },
        )
        .await
        .unwrap();
    }

    let rows = LearningRepo::list(&pool, &LearningFilter::default(), &ListQuery::default())
        .await
        .unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Scales", "Basics", "Anatomy", "Rhythm"]);
    assert!(rows.iter().all(|r| r.is_published));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_newest_first_and_read_filter(pool: PgPool) {
    let mut ids = Vec::new();
    for subject in ["first", "second", "third"] {
        let c = ContactRepo::create(
            &pool,
            &CreateContact {
                name: "V".into(),
                email: "v@example.org".into(),
                subject: subject.into(),
                message: "m".into(),
            },
        )
        .await
        .unwrap();
        ids.push(c.id);
    }
    ContactRepo::set_read(&pool, &ids[..1], true).await.unwrap();

    let all = ContactRepo::list(&pool, &ContactFilter::default(), &ListQuery::default())
        .await
        .unwrap();
    let subjects: Vec<&str> = all.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["third", "second", "first"]);

    let unread = ContactRepo::list(
        &pool,
        &ContactFilter {
            is_read: Some(false),
        },
        &ListQuery::default(),
    )
    .await
    .unwrap();
    assert_eq!(unread.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_media_search_by_instrument_name(pool: PgPool) {
    let c = category(&pool, "Percussion", "percussion").await;
    let madal = instrument(&pool, c, "Madal", "Hills", false).await;
    let dhime = instrument(&pool, c, "Dhime", "Valley", false).await;
    for (instrument_id, media_type, file) in [
        (madal, "image", "a.png"),
        (madal, "audio", "a.mp3"),
        (dhime, "audio", "b.mp3"),
    ] {
        MediaRepo::create(
            &pool,
            &NewMedia {
                instrument_id,
                media_type,
                file,
                title: "",
                is_primary: false,
            },
        )
        .await
        .unwrap();
    }

    let rows = MediaRepo::list(
        &pool,
        &MediaFilter::default(),
        &ListQuery {
            search: Some("madal".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let types: Vec<&str> = rows.iter().map(|m| m.media_type.as_str()).collect();
    assert_eq!(types, vec!["audio", "image"]);

    let audio = MediaRepo::list(
        &pool,
        &MediaFilter {
            media_type: Some("audio".into()),
            ..Default::default()
        },
        &ListQuery::default(),
    )
    .await
    .unwrap();
    assert_eq!(audio.len(), 2);
}
