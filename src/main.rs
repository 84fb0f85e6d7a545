mod app_system;
mod browse;
mod catalogue;
mod clients;
mod config;
mod domain;
mod error;
mod messages;
mod notify;
mod session;
mod validation;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use tracing::{info, warn, Instrument};

use crate::app_system::{setup_tracing, ConsoleSystem};
use crate::browse::Route;
use crate::config::ConsoleConfig;
use crate::domain::PhotoFile;
use crate::validation::FormEdit;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ConsoleConfig::from_env()?;
    info!(?config, "Starting catalogue console");

    let system = ConsoleSystem::start(&config)?;
    let session = &system.session;

    session.load().await?;
    session.navigate(Route::parse("/products/2/2")?).await?;

    // Create a product and give it a photo
    let span = tracing::info_span!("create_product");
    let created = async {
        session.start_create().await?;
        session.edit_form(FormEdit::Name("Widget".into())).await?;
        session.edit_form(FormEdit::CurrentPrice(Some(9.99))).await?;
        session.select_category(3).await?;
        let created = session.submit().await?;
        session
            .attach_photo(PhotoFile::new("widget.png", vec![0x89, b'P', b'N', b'G']))
            .await?;
        session.dismiss().await?;
        Ok::<_, crate::error::SessionError>(created)
    }
    .instrument(span)
    .await?;

    info!(product_id = created.id, "Product created");

    // Thumbnails for the listing, then reopen the new product's photo
    session.navigate(Route::All).await?;
    let thumbnails = session.load_thumbnails().await?;
    info!(thumbnails, "Thumbnails cached");
    session.start_photo_edit(created.clone()).await?;
    session
        .select_photo(PhotoFile::new("widget-v2.png", vec![0x89, b'P', b'N', b'G', 2]))
        .await?;
    session.upload_pending().await?;
    session.dismiss().await?;

    // Edit an existing product, then walk away
    let span = tracing::info_span!("edit_product");
    async {
        session.navigate(Route::All).await?;
        let snapshot = session.snapshot().await?;
        let Some(first) = snapshot.products.first().cloned() else {
            warn!("Catalogue is empty, nothing to edit");
            return Ok::<(), crate::error::SessionError>(());
        };
        session.start_edit(first).await?;
        session.edit_form(FormEdit::Promotion(true)).await?;
        session.submit().await?;
        session.cancel().await
    }
    .instrument(span)
    .await?;

    let snapshot = session.snapshot().await?;
    info!(phase = ?snapshot.phase, product_count = snapshot.products.len(), "Final state");

    system.shutdown().await.map_err(anyhow::Error::msg)?;

    info!("Console completed successfully");
    Ok(())
}
