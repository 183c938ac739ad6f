use crate::db::repositories::LocalRepository;
use crate::models::{AnimeChanges, AnimeId, NewAnime, Season};
use crate::services::{anime, ServiceError};

fn entry(title: &str, popularity: i32) -> NewAnime {
    NewAnime {
        title_romaji: title.to_string(),
        title_english: None,
        genres: vec![],
        season: None,
        season_year: None,
        episodes: None,
        average_score: None,
        popularity,
    }
}

#[tokio::test]
async fn pagination_offset_math() {
    let repo = LocalRepository::new();
    for i in 0..5 {
        anime::create_anime(&repo, entry(&format!("title-{i}"), 100 - i))
            .await
            .unwrap();
    }

    let first = anime::list_anime(&repo, 1, 2).await.unwrap();
    let second = anime::list_anime(&repo, 2, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_ne!(first[0].id, second[0].id);

    // Page 0 clamps to the first page rather than producing a negative
    // offset.
    let clamped = anime::list_anime(&repo, 0, 2).await.unwrap();
    assert_eq!(clamped[0].id, first[0].id);
}

#[tokio::test]
async fn extreme_pagination_values_do_not_overflow() {
    let repo = LocalRepository::new();
    anime::create_anime(&repo, entry("solo", 10)).await.unwrap();

    // Query values arrive straight off the wire; the offset math must
    // saturate instead of overflowing.
    let page = anime::list_anime(&repo, i64::MAX, i64::MAX).await.unwrap();
    assert!(page.is_empty());

    let page = anime::list_anime(&repo, i64::MAX, 2).await.unwrap();
    assert!(page.is_empty());

    let page = anime::list_anime(&repo, i64::MIN, i64::MIN).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn negative_limit_clamps_to_empty_on_every_backend_path() {
    let repo = LocalRepository::new();
    let mut tagged = entry("tagged", 10);
    tagged.genres = vec!["Action".to_string()];
    anime::create_anime(&repo, tagged).await.unwrap();

    // The clamp happens in the service so backends never see a negative
    // limit (Postgres would reject `LIMIT -n` outright).
    let page = anime::list_anime(&repo, 1, -5).await.unwrap();
    assert!(page.is_empty());

    let found = anime::anime_by_genre(&repo, "Action", -1).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn search_requires_non_blank_title() {
    let repo = LocalRepository::new();
    let err = anime::search_anime(&repo, "   ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(msg) if msg == "Search title is required"));
}

#[tokio::test]
async fn genre_requires_non_blank_value() {
    let repo = LocalRepository::new();
    let err = anime::anime_by_genre(&repo, "", 50).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(msg) if msg == "Genre is required"));
}

#[tokio::test]
async fn season_is_validated_and_case_insensitive() {
    let repo = LocalRepository::new();
    let mut winter = entry("frieren", 10);
    winter.season = Some(Season::Winter);
    winter.season_year = Some(2024);
    anime::create_anime(&repo, winter).await.unwrap();

    let found = anime::anime_by_season(&repo, "winter", 2024).await.unwrap();
    assert_eq!(found.len(), 1);

    let err = anime::anime_by_season(&repo, "MONSOON", 2024)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(msg)
            if msg == "Invalid season. Must be one of: WINTER, SPRING, SUMMER, FALL"
    ));
}

#[tokio::test]
async fn missing_anime_is_not_found() {
    let repo = LocalRepository::new();
    let err = anime::get_anime(&repo, AnimeId::new(7)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(msg) if msg == "Anime not found"));

    let err = anime::update_anime(&repo, AnimeId::new(7), AnimeChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = anime::delete_anime(&repo, AnimeId::new(7)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let repo = LocalRepository::new();
    let created = anime::create_anime(&repo, entry("mushishi", 50)).await.unwrap();

    let changes = AnimeChanges {
        average_score: Some(89),
        ..Default::default()
    };
    let updated = anime::update_anime(&repo, created.id, changes).await.unwrap();
    assert_eq!(updated.average_score, Some(89));
    assert_eq!(updated.title_romaji, "mushishi");
}
