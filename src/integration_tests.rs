#[cfg(test)]
mod tests {
    use crate::browse::Route;
    use crate::catalogue::InMemoryCatalogue;
    use crate::domain::{PhotoFile, ProductRecord};
    use crate::messages::CatalogueRequest;
    use crate::mock_framework::{create_mock_catalogue, expect_create, expect_fetch_photo, expect_upload_photo};
    use crate::notify::{Level, Notifier};
    use crate::session::{Phase, ProductEditController};
    use crate::validation::{FormEdit, FormMode};

    #[tokio::test]
    async fn test_create_widget_flow() {
        // 1. Setup mocks
        let (catalogue, mut catalogue_rx) = create_mock_catalogue(10);
        let (notifier, mut notifications) = Notifier::channel();
        let mut controller = ProductEditController::new(catalogue, notifier);

        // 2. Fill the create form and submit in the background
        controller.start_create();
        controller.edit_form(FormEdit::Name("Widget".into())).unwrap();
        controller.edit_form(FormEdit::CurrentPrice(Some(9.99))).unwrap();
        controller.edit_form(FormEdit::Category(Some(3))).unwrap();

        let submit_task = tokio::spawn(async move {
            let result = controller.submit().await;
            (controller, result)
        });

        // 3. Verify interactions
        let (draft, responder) = expect_create(&mut catalogue_rx).await.expect("Expected Create");
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.current_price, 9.99);
        assert_eq!(draft.category_id, 3);
        responder.send(Ok(ProductRecord::new(77, "Widget", 9.99, 3))).unwrap();

        // 4. Verify result
        let (mut controller, result) = submit_task.await.unwrap();
        assert_eq!(result.unwrap().id, 77);
        assert_eq!(controller.phase(), Phase::Saved);
        assert_eq!(controller.session().unwrap().product_id(), Some(77));

        let toast = notifications.try_recv().unwrap();
        assert_eq!(toast.level, Level::Success);

        // 5. Attach a photo to the saved product
        let file = PhotoFile::new("widget.png", vec![1, 2, 3]);
        let upload_task = tokio::spawn(async move {
            let result = controller.attach_photo(file).await;
            (controller, result)
        });

        let (file, product_id, category_id, responder) =
            expect_upload_photo(&mut catalogue_rx).await.expect("Expected UploadPhoto");
        assert_eq!(file.file_name, "widget.png");
        assert_eq!((product_id, category_id), (77, 3));
        responder.send(Ok(())).unwrap();

        let (controller, result) = upload_task.await.unwrap();
        result.unwrap();
        assert_eq!(controller.phase(), Phase::Saved);

        let (id, _refresh) = expect_fetch_photo(&mut catalogue_rx).await.expect("Expected photo refresh");
        assert_eq!(id, 77);
    }

    #[tokio::test]
    async fn test_edit_then_cancel_reloads_once() {
        let (catalogue, mut catalogue_rx) = create_mock_catalogue(10);
        let (notifier, _notifications) = Notifier::channel();
        let mut controller = ProductEditController::new(catalogue, notifier);

        controller.start_edit(ProductRecord::new(5, "Lamp", 20.0, 2));
        assert_eq!(controller.session().unwrap().mode(), FormMode::Edit);

        let cancel_task = tokio::spawn(async move {
            let result = controller.cancel().await;
            (controller, result)
        });

        // The photo fetch from start_edit and the reload may arrive in either order.
        let mut reloads = 0;
        let mut photo_fetches = 0;
        while reloads == 0 {
            match catalogue_rx.recv().await.expect("catalogue request") {
                CatalogueRequest::FetchProducts { respond_to } => {
                    reloads += 1;
                    respond_to.send(Ok(vec![ProductRecord::new(5, "Lamp", 20.0, 2)])).unwrap();
                }
                CatalogueRequest::FetchPhoto { id, respond_to } => {
                    assert_eq!(id, 5);
                    photo_fetches += 1;
                    drop(respond_to);
                }
                other => panic!("Unexpected request: {:?}", other),
            }
        }

        let (controller, result) = cancel_task.await.unwrap();
        result.unwrap();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.session().is_none());
        assert_eq!(controller.browser().products().len(), 1);

        while let Ok(request) = catalogue_rx.try_recv() {
            match request {
                CatalogueRequest::FetchPhoto { .. } => photo_fetches += 1,
                other => panic!("Unexpected request: {:?}", other),
            }
        }
        assert_eq!(reloads, 1);
        assert!(photo_fetches <= 1);
    }

    #[tokio::test]
    async fn test_category_browsing_then_edit_against_memory_catalogue() {
        let (service, catalogue) = InMemoryCatalogue::new(10);
        tokio::spawn(
            service
                .with_category(2, "Lamps")
                .with_category(3, "Tools")
                .with_product(ProductRecord::new(5, "Lamp", 20.0, 2))
                .with_product(ProductRecord::new(6, "Saw", 18.0, 3))
                .run(),
        );
        let (notifier, _notifications) = Notifier::channel();
        let mut controller = ProductEditController::new(catalogue, notifier);

        controller.load().await.unwrap();
        assert_eq!(controller.phase(), Phase::Creating);
        assert_eq!(controller.browser().categories().len(), 2);

        let route = Route::parse("/products/2/3").unwrap();
        controller.navigate(route).await.unwrap();
        let saw = controller.browser().products()[0].clone();
        assert_eq!(saw.name, "Saw");

        controller.start_edit(saw);
        controller.edit_form(FormEdit::CurrentPrice(Some(21.0))).unwrap();
        let updated = controller.submit().await.unwrap();
        assert_eq!(updated.current_price, 21.0);
        assert_eq!(controller.phase(), Phase::Updated);

        controller.dismiss().await.unwrap();
        assert_eq!(controller.browser().route(), Route::Category(3));
        assert_eq!(controller.browser().products()[0].current_price, 21.0);
    }
}
