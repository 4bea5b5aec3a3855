use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::beers::DeleteBreweryBeers;
use crate::error::AppError;
use crate::images::{DeleteImage, ImageOwner};
use crate::mediator::{Mediator, RequestContext};
use crate::opinions::{DeleteBeerOpinions, DeleteUserOpinions};

/// Something that happened in one service that others may react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BeerCreated { beer_id: i64, brewery_id: i64 },
    BeerDeleted { beer_id: i64 },
    BreweryDeleted { brewery_id: i64 },
    OpinionCreated { opinion_id: i64, beer_id: i64, rating: i32 },
    UserDeleted { user_id: i64 },
    ImageUploaded { owner: ImageOwner, uri: String },
    ImageDeleted { owner: ImageOwner },
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), AppError>;
}

/// Fan-out of domain events to every subscriber in the process.
pub struct InProcessEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl InProcessEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for InProcessEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<(), AppError> {
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published event to {} subscriber(s)", receivers),
            Err(broadcast::error::SendError(event)) => {
                debug!("No subscribers for event {:?}", event)
            }
        }
        Ok(())
    }
}

/// Reacts to domain events by sending follow-up commands as the system actor.
#[derive(Clone)]
pub struct EventConsumer {
    mediator: Arc<Mediator>,
}

impl EventConsumer {
    pub fn new(mediator: Arc<Mediator>) -> Self {
        Self { mediator }
    }

    /// Consumes `events` until the bus is dropped.
    ///
    /// A forwarding task moves events into an unbounded queue, so a long
    /// cascade never leaves the broadcast receiver behind.
    pub fn spawn(self, mut events: broadcast::Receiver<DomainEvent>) -> JoinHandle<()> {
        let (queue, mut pending) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if queue.send(event).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        error!("Event consumer lagged, lost {} event(s)", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        tokio::spawn(async move {
            while let Some(event) = pending.recv().await {
                if let Err(e) = self.dispatch(&event).await {
                    warn!("Failed to handle {:?}: {}", event, e);
                }
            }
            info!("Event consumer stopped");
        })
    }

    pub async fn dispatch(&self, event: &DomainEvent) -> Result<(), AppError> {
        let ctx = RequestContext::system();

        match *event {
            DomainEvent::BreweryDeleted { brewery_id } => {
                let beer_ids = self
                    .mediator
                    .send(&ctx, DeleteBreweryBeers { brewery_id })
                    .await?;
                debug!("Removed {} beer(s) of brewery {}", beer_ids.len(), brewery_id);

                // Inline: this task drains the bus and must not refill it
                for beer_id in beer_ids {
                    self.beer_removed(&ctx, beer_id).await?;
                }

                self.mediator
                    .send(
                        &ctx,
                        DeleteImage {
                            owner: ImageOwner::Brewery { id: brewery_id },
                        },
                    )
                    .await?;
            }
            DomainEvent::BeerDeleted { beer_id } => self.beer_removed(&ctx, beer_id).await?,
            DomainEvent::UserDeleted { user_id } => {
                let removed = self
                    .mediator
                    .send(&ctx, DeleteUserOpinions { user_id })
                    .await?;
                debug!("Removed {} opinion(s) of user {}", removed, user_id);
            }
            _ => {}
        }
        Ok(())
    }

    async fn beer_removed(&self, ctx: &RequestContext, beer_id: i64) -> Result<(), AppError> {
        let removed = self
            .mediator
            .send(ctx, DeleteBeerOpinions { beer_id })
            .await?;
        debug!("Removed {} opinion(s) of beer {}", removed, beer_id);

        self.mediator
            .send(
                ctx,
                DeleteImage {
                    owner: ImageOwner::Beer { id: beer_id },
                },
            )
            .await?;
        Ok(())
    }
}
