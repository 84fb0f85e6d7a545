use std::time::Duration;

use tracing::{error, info};

use crate::catalogue::{HttpCatalogue, InMemoryCatalogue};
use crate::clients::{CatalogueClient, SessionClient};
use crate::config::{Backend, ConsoleConfig};
use crate::domain::ProductRecord;
use crate::error::CatalogueError;
use crate::notify::NotificationLog;
use crate::session::{ProductEditController, SessionActor};

/// The running console: catalogue backend, notification log and one
/// products-page session, wired together.
pub struct ConsoleSystem {
    pub session: SessionClient,
    pub catalogue: CatalogueClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ConsoleSystem {
    pub fn start(config: &ConsoleConfig) -> Result<Self, CatalogueError> {
        // 1. Catalogue backend
        let (catalogue, catalogue_handle) = match &config.backend {
            Backend::Memory => {
                info!("Using in-memory catalogue");
                let (service, client) = seed_demo(InMemoryCatalogue::new(config.channel_buffer));
                (client, tokio::spawn(service.run()))
            }
            Backend::Http { base_url } => {
                info!(%base_url, "Using HTTP catalogue");
                let (service, client) = HttpCatalogue::new(
                    base_url.clone(),
                    Duration::from_secs(config.timeout_secs),
                    config.channel_buffer,
                )?;
                (client, tokio::spawn(service.run()))
            }
        };

        // 2. Notification sink
        let (log, notifier) = NotificationLog::new();
        let log_handle = tokio::spawn(log.run());

        // 3. Products page session
        let controller = ProductEditController::new(catalogue.clone(), notifier);
        let (actor, session) = SessionActor::new(config.channel_buffer, controller);
        let session_handle = tokio::spawn(actor.run());

        Ok(Self {
            session,
            catalogue,
            handles: vec![session_handle, catalogue_handle, log_handle],
        })
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down console...");

        // The log stops on its own once the session drops the last notifier.
        let _ = self.session.shutdown().await;
        let _ = self.catalogue.shutdown().await;
        drop(self.session);
        drop(self.catalogue);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}

fn seed_demo(
    (service, client): (InMemoryCatalogue, CatalogueClient),
) -> (InMemoryCatalogue, CatalogueClient) {
    let mut lamp = ProductRecord::new(1, "Desk lamp", 24.5, 1);
    lamp.description = "Adjustable arm, warm white".to_string();
    let mut hammer = ProductRecord::new(2, "Claw hammer", 12.0, 2);
    hammer.promotion = true;

    let service = service
        .with_category(1, "Lighting")
        .with_category(2, "Tools")
        .with_category(3, "Hardware")
        .with_product(lamp)
        .with_product(hammer);
    (service, client)
}
