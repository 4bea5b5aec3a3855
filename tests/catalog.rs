mod common;

use beer_catalog::{
    beers::{BeerDto, BeerInput, CreateBeer, DeleteBeer, GetBeerById, GetBeers, UpdateBeer},
    beers::filtering::BeersFilter,
    breweries::{filtering::BreweriesFilter, DeleteBrewery, GetBreweries, GetBreweryById, UpdateBrewery},
    filtering::{ListParams, SortDirection},
    styles::{
        BeerStyleDto, BeerStyleInput, CreateBeerStyle, DeleteBeerStyle, GetBeerStyles, UpdateBeerStyle,
    },
    AppError, AppState, RequestContext,
};
use common::admin;

async fn create_style(app: &AppState, name: &str) -> BeerStyleDto {
    app.mediator
        .send(
            &admin(),
            CreateBeerStyle {
                input: BeerStyleInput {
                    name: name.to_string(),
                    description: None,
                    country_of_origin: Some("Czech Republic".to_string()),
                },
            },
        )
        .await
        .unwrap()
}

fn beer_input(name: &str, brewery_id: i64, abv: f64) -> BeerInput {
    BeerInput {
        name: name.to_string(),
        brewery_id,
        alcohol_by_volume: abv,
        ..Default::default()
    }
}

async fn create_beer(app: &AppState, input: BeerInput) -> BeerDto {
    app.mediator
        .send(&admin(), CreateBeer { input })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_beer_resolves_brewery_and_style() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;
    let style = create_style(&app, "Pilsner").await;

    let mut input = beer_input("Pils", brewery.id, 4.9);
    input.beer_style_id = Some(style.id);
    input.ibu = Some(35);
    let beer = create_beer(&app, input).await;

    assert!(beer.id > 0);
    assert_eq!(beer.brewery_name.as_deref(), Some("Pinta"));
    assert_eq!(beer.beer_style_name.as_deref(), Some("Pilsner"));

    let fetched = app
        .mediator
        .send(&RequestContext::anonymous(), GetBeerById { id: beer.id })
        .await
        .unwrap();
    assert_eq!(fetched, beer);
}

#[tokio::test]
async fn test_create_beer_requires_existing_references() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(&admin(), CreateBeer { input: beer_input("Ghost", 99, 5.0) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "Brewery", id: 99 }));

    let brewery = common::create_brewery(&app, "Pinta").await;
    let mut input = beer_input("Ghost", brewery.id, 5.0);
    input.beer_style_id = Some(42);
    let err = app.mediator.send(&admin(), CreateBeer { input }).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "BeerStyle", id: 42 }));
}

#[tokio::test]
async fn test_beer_names_are_unique_per_brewery() {
    let app = common::create_test_app_state().await;
    let pinta = common::create_brewery(&app, "Pinta").await;
    let artezan = common::create_brewery(&app, "Artezan").await;

    create_beer(&app, beer_input("Atak Chmielu", pinta.id, 6.1)).await;

    let err = app
        .mediator
        .send(&admin(), CreateBeer { input: beer_input("atak chmielu", pinta.id, 6.1) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Same name at another brewery is fine
    create_beer(&app, beer_input("Atak Chmielu", artezan.id, 6.1)).await;
}

#[tokio::test]
async fn test_invalid_beer_is_rejected_with_every_failure() {
    let app = common::create_test_app_state().await;

    let mut input = beer_input("", 0, 70.0);
    input.ibu = Some(-1);
    let err = app.mediator.send(&admin(), CreateBeer { input }).await.unwrap_err();

    let AppError::Validation(failures) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "brewery_id", "alcohol_by_volume", "ibu"]);
}

#[tokio::test]
async fn test_update_beer_keeps_image_and_creation_time() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;
    let beer = create_beer(&app, beer_input("Pils", brewery.id, 4.9)).await;

    let updated = app
        .mediator
        .send(
            &admin(),
            UpdateBeer {
                id: beer.id,
                input: beer_input("Pils Premium", brewery.id, 5.2),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Pils Premium");
    assert_eq!(updated.alcohol_by_volume, 5.2);
    assert_eq!(updated.created_at, beer.created_at);
    assert_eq!(updated.image_uri, None);
}

#[tokio::test]
async fn test_beers_are_filtered_sorted_and_paged() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;
    for (name, abv) in [("A", 4.0), ("B", 5.5), ("C", 7.0), ("D", 5.0), ("E", 9.5)] {
        create_beer(&app, beer_input(name, brewery.id, abv)).await;
    }

    let page = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            GetBeers {
                filter: BeersFilter {
                    min_alcohol_by_volume: Some(5.0),
                    ..Default::default()
                },
                list: ListParams::page(1, 2).sorted_by("alcohol_by_volume", SortDirection::Desc),
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = page.items.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["E", "C"]);
    assert_eq!(page.total_count, 4);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next);
    assert!(!page.has_previous);

    let beyond = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            GetBeers {
                list: ListParams::page(5, 2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_count, 5);
}

#[tokio::test]
async fn test_unknown_sort_column_is_rejected() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            GetBeers {
                list: ListParams::default().sorted_by("colour", SortDirection::Asc),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_beer() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;
    let beer = create_beer(&app, beer_input("Pils", brewery.id, 4.9)).await;

    tokio_test::assert_ok!(app.mediator.send(&admin(), DeleteBeer { id: beer.id }).await);

    let err = app
        .mediator
        .send(&admin(), DeleteBeer { id: beer.id })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { entity: "Beer", .. }));
}

#[tokio::test]
async fn test_brewery_names_are_unique() {
    let app = common::create_test_app_state().await;
    let pinta = common::create_brewery(&app, "Pinta").await;
    let artezan = common::create_brewery(&app, "Artezan").await;

    let err = app
        .mediator
        .send(
            &admin(),
            UpdateBrewery {
                id: artezan.id,
                input: common::brewery_input("PINTA"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Renaming to its own name is not a conflict
    let renamed = app
        .mediator
        .send(
            &admin(),
            UpdateBrewery {
                id: pinta.id,
                input: common::brewery_input("Pinta"),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Pinta");
}

#[tokio::test]
async fn test_breweries_filter_by_city() {
    let app = common::create_test_app_state().await;
    common::create_brewery(&app, "Pinta").await;

    let mut input = common::brewery_input("Stu Mostow");
    input.address.city = "Wroclaw".to_string();
    app.mediator
        .send(&admin(), beer_catalog::breweries::CreateBrewery { input })
        .await
        .unwrap();

    let found = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            GetBreweries {
                filter: BreweriesFilter {
                    city: Some("wroc".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].name, "Stu Mostow");
    assert_eq!(found.items[0].city, "Wroclaw");
}

#[tokio::test]
async fn test_delete_brewery() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;

    app.mediator
        .send(&admin(), DeleteBrewery { id: brewery.id })
        .await
        .unwrap();

    let err = app
        .mediator
        .send(&RequestContext::anonymous(), GetBreweryById { id: brewery.id })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_style_names_are_unique() {
    let app = common::create_test_app_state().await;
    create_style(&app, "Porter").await;

    let err = app
        .mediator
        .send(
            &admin(),
            CreateBeerStyle {
                input: BeerStyleInput {
                    name: " porter ".to_string(),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_style_in_use_cannot_be_deleted() {
    let app = common::create_test_app_state().await;
    let brewery = common::create_brewery(&app, "Pinta").await;
    let style = create_style(&app, "Stout").await;
    let mut input = beer_input("Imperial", brewery.id, 9.0);
    input.beer_style_id = Some(style.id);
    let beer = create_beer(&app, input).await;

    let err = app
        .mediator
        .send(&admin(), DeleteBeerStyle { id: style.id })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    app.mediator.send(&admin(), DeleteBeer { id: beer.id }).await.unwrap();
    tokio_test::assert_ok!(app.mediator.send(&admin(), DeleteBeerStyle { id: style.id }).await);
}

#[tokio::test]
async fn test_styles_sorted_by_name() {
    let app = common::create_test_app_state().await;
    for name in ["Stout", "lager", "IPA"] {
        create_style(&app, name).await;
    }

    let styles = app
        .mediator
        .send(
            &RequestContext::anonymous(),
            GetBeerStyles {
                list: ListParams::default().sorted_by("NAME", SortDirection::Asc),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = styles.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["IPA", "lager", "Stout"]);
}

#[tokio::test]
async fn test_update_missing_style() {
    let app = common::create_test_app_state().await;

    let err = app
        .mediator
        .send(
            &admin(),
            UpdateBeerStyle {
                id: 5,
                input: BeerStyleInput {
                    name: "Bock".to_string(),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { entity: "BeerStyle", id: 5 }));
}
