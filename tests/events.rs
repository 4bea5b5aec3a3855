mod common;

use beer_catalog::{
    beers::{BeerInput, CreateBeer, GetBeers},
    breweries::DeleteBrewery,
    events::DomainEvent,
    images::{GetImage, ImageOwner, UploadImage},
    opinions::{CreateOpinion, GetOpinions, OpinionInput},
    users::DeleteUser,
    AppError, AppState, RequestContext,
};
use common::{admin, as_user};
use std::time::Duration;

/// A brewery with `beers` beers, each rated once by a fresh user.
async fn rated_brewery(app: &AppState, beers: usize) -> i64 {
    let brewery = common::create_brewery(app, "Browar Stu Mostów").await;
    let rater = common::sign_up(app, "rater").await;

    for n in 0..beers {
        let beer = app
            .mediator
            .send(
                &admin(),
                CreateBeer {
                    input: BeerInput {
                        name: format!("Salamander {}", n),
                        brewery_id: brewery.id,
                        alcohol_by_volume: 5.0,
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();
        app.mediator
            .send(
                &as_user(&rater),
                CreateOpinion {
                    beer_id: beer.id,
                    input: OpinionInput {
                        rating: 7,
                        comment: None,
                    },
                },
            )
            .await
            .unwrap();
    }
    brewery.id
}

async fn wait_for_no_opinions(app: &AppState) -> usize {
    let mut remaining = usize::MAX;
    for _ in 0..100 {
        remaining = app
            .mediator
            .send(&RequestContext::anonymous(), GetOpinions::default())
            .await
            .unwrap()
            .total_count;
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    remaining
}

#[tokio::test]
async fn test_deleting_brewery_cascades() {
    let app = common::create_test_app_state().await;
    let mut events = app.events.subscribe();

    let brewery = common::create_brewery(&app, "Pinta").await;
    let beer = app
        .mediator
        .send(
            &admin(),
            CreateBeer {
                input: BeerInput {
                    name: "Atak Chmielu".to_string(),
                    brewery_id: brewery.id,
                    alcohol_by_volume: 6.1,
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    let ola = common::sign_up(&app, "ola").await;
    app.mediator
        .send(
            &as_user(&ola),
            CreateOpinion {
                beer_id: beer.id,
                input: OpinionInput {
                    rating: 9,
                    comment: None,
                },
            },
        )
        .await
        .unwrap();
    let beer_image = ImageOwner::Beer { id: beer.id };
    app.mediator
        .send(
            &admin(),
            UploadImage {
                owner: beer_image,
                file_name: "label.png".to_string(),
                content_type: "image/png".to_string(),
                content: vec![7],
            },
        )
        .await
        .unwrap();
    common::drain_events(&app, &mut events).await;

    app.mediator
        .send(&admin(), DeleteBrewery { id: brewery.id })
        .await
        .unwrap();
    let seen = common::drain_events(&app, &mut events).await;

    assert!(seen.contains(&DomainEvent::BreweryDeleted { brewery_id: brewery.id }));
    assert!(seen.contains(&DomainEvent::ImageDeleted { owner: beer_image }));

    let anonymous = RequestContext::anonymous();
    let beers = app.mediator.send(&anonymous, GetBeers::default()).await.unwrap();
    assert_eq!(beers.total_count, 0);
    let opinions = app.mediator.send(&anonymous, GetOpinions::default()).await.unwrap();
    assert_eq!(opinions.total_count, 0);
    let err = app
        .mediator
        .send(&anonymous, GetImage { owner: beer_image })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn test_spawned_consumer_removes_opinions_of_deleted_user() {
    let app = common::create_test_app_state().await;
    let consumer = app.spawn_event_consumer();

    let brewery = common::create_brewery(&app, "Pinta").await;
    let beer = app
        .mediator
        .send(
            &admin(),
            CreateBeer {
                input: BeerInput {
                    name: "Pils".to_string(),
                    brewery_id: brewery.id,
                    alcohol_by_volume: 4.9,
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
    let ola = common::sign_up(&app, "ola").await;
    app.mediator
        .send(
            &as_user(&ola),
            CreateOpinion {
                beer_id: beer.id,
                input: OpinionInput {
                    rating: 4,
                    comment: None,
                },
            },
        )
        .await
        .unwrap();

    app.mediator
        .send(&as_user(&ola), DeleteUser { id: ola.id })
        .await
        .unwrap();

    assert_eq!(wait_for_no_opinions(&app).await, 0);

    consumer.abort();
}

#[tokio::test]
async fn test_brewery_cascade_outgrows_the_bus() {
    let app = common::create_test_app_state_with(|config| config.event_bus_capacity = 4).await;
    let brewery_id = rated_brewery(&app, 12).await;
    let mut events = app.events.subscribe();

    app.mediator
        .send(&admin(), DeleteBrewery { id: brewery_id })
        .await
        .unwrap();
    common::drain_events(&app, &mut events).await;

    let anonymous = RequestContext::anonymous();
    let beers = app.mediator.send(&anonymous, GetBeers::default()).await.unwrap();
    assert_eq!(beers.total_count, 0);
    let opinions = app.mediator.send(&anonymous, GetOpinions::default()).await.unwrap();
    assert_eq!(opinions.total_count, 0);
}

#[tokio::test]
async fn test_spawned_consumer_cascades_large_brewery() {
    let app = common::create_test_app_state_with(|config| config.event_bus_capacity = 4).await;
    let brewery_id = rated_brewery(&app, 12).await;
    let consumer = app.spawn_event_consumer();

    app.mediator
        .send(&admin(), DeleteBrewery { id: brewery_id })
        .await
        .unwrap();

    assert_eq!(wait_for_no_opinions(&app).await, 0);

    consumer.abort();
}
