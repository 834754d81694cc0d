#![allow(clippy::unwrap_used, clippy::panic)]
//! End-to-end flows against an in-memory page.

mod common;

use common::{
    setup, CATEGORY_FORM, CATEGORY_FORM_INVALID, WIDGET_FORM, WIDGET_FORM_INVALID,
};
use popupcrud_core::types::{Container, DialogId, EventTarget, SelectRef, SubmitOutcome, Trigger};
use popupcrud_core::{CrudError, TriggerOutcome};

fn opened(outcome: TriggerOutcome) -> DialogId {
    match outcome {
        TriggerOutcome::Opened(dialog) => dialog,
        other => panic!("expected a dialog, got {other:?}"),
    }
}

#[tokio::test]
async fn create_flow_with_one_validation_failure() {
    let (controller, page, transport) = setup();
    controller.initialize().await.unwrap();
    transport.respond("/widget/new", WIDGET_FORM).await;
    transport.respond("/widget/new", WIDGET_FORM_INVALID).await;
    transport.respond("/widget/new", r#"{"pk": 12, "name": "Sprocket"}"#).await;

    let dialog = opened(
        controller
            .handle(Trigger::CreateEdit {
                url: "/widget/new".to_string(),
                title: "New Widget".to_string(),
            })
            .await
            .unwrap(),
    );
    assert_eq!(dialog, DialogId::from("create-edit-modal"));
    let snapshot = page.dialog(&dialog).unwrap();
    assert!(snapshot.visible);
    assert_eq!(snapshot.title, "New Widget");

    // First submit comes back with field errors.
    let outcome = controller.submit(&dialog).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rerendered { .. }));
    let snapshot = page.dialog(&dialog).unwrap();
    assert!(snapshot.visible);
    assert!(snapshot.body.contains("has-error"));
    assert_eq!(page.reload_count(), 0);
    assert!(controller.is_armed(&dialog).await);

    // Second submit is accepted.
    let outcome = controller.submit(&dialog).await.unwrap();
    assert!(outcome.is_accepted());
    assert!(!page.dialog(&dialog).unwrap().visible);
    assert_eq!(page.reload_count(), 1);

    let submissions = transport.submissions().await;
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].field("name"), Some("Sprocket"));
    assert_eq!(submissions[0].field("csrfmiddlewaretoken"), Some("tok"));

    // Readiness fired for the load and for the re-render.
    assert_eq!(page.events_named("crudform.ready").len(), 2);
}

#[tokio::test]
async fn nested_add_another_patches_outer_select() {
    let (controller, page, transport) = setup();
    controller.initialize().await.unwrap();
    transport.respond("/widget/new", WIDGET_FORM).await;
    transport.respond("/category/new", CATEGORY_FORM).await;
    transport.respond("/category/new", CATEGORY_FORM_INVALID).await;
    transport
        .respond("/category/new", r#"{"pk": "9", "name": "Gadgets"}"#)
        .await;

    let outer = opened(
        controller
            .handle(Trigger::CreateEdit {
                url: "/widget/new".to_string(),
                title: "New Widget".to_string(),
            })
            .await
            .unwrap(),
    );
    let nested = opened(
        controller
            .handle(Trigger::AddAnother {
                trigger_id: "add_id_category".to_string(),
            })
            .await
            .unwrap(),
    );
    assert_eq!(nested, DialogId::from("add_id_category-modal"));
    assert_eq!(page.dialog(&nested).unwrap().title, "Add Category");

    let outer_z = controller.z_index_of(&outer).await.unwrap();
    let nested_z = controller.z_index_of(&nested).await.unwrap();
    assert!(nested_z > outer_z);

    // Backdrops are layered under their dialogs on the next tick.
    controller.tick().await;
    let backdrop_z: Vec<u32> = page.backdrops().iter().filter_map(|b| b.z_index).collect();
    assert_eq!(backdrop_z, vec![outer_z - 1, nested_z - 1]);

    // The nested form is rejected once, then accepted.
    let outcome = controller.submit(&nested).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rerendered { .. }));
    assert!(page.dialog(&nested).unwrap().body.contains("alert-danger"));

    let outcome = controller.submit(&nested).await.unwrap();
    assert!(outcome.is_accepted());

    let select = SelectRef::new(&outer, "category");
    let state = page.select(&select).unwrap();
    assert!(state.options.contains(&("9".to_string(), "Gadgets".to_string())));
    assert_eq!(state.selected, vec!["9".to_string()]);
    assert_eq!(page.events_named("change"), vec![EventTarget::Select(select)]);

    // Only the nested dialog closed; the outer form is still live.
    assert!(!page.dialog(&nested).unwrap().visible);
    assert!(page.dialog(&outer).unwrap().visible);
    assert!(controller.is_armed(&outer).await);
    assert_eq!(controller.visible_dialogs().await, vec![outer.clone()]);
    assert_eq!(page.reload_count(), 0);

    // The outer submission carries the new category.
    transport.respond("/widget/new", r#"{"pk": 13, "name": "Sprocket"}"#).await;
    controller.submit(&outer).await.unwrap();
    let last = transport.submissions().await.pop().unwrap();
    assert_eq!(last.field("category"), Some("9"));
    assert_eq!(page.reload_count(), 1);
}

#[tokio::test]
async fn delete_flow_shows_result_and_reloads_on_close() {
    let (controller, page, transport) = setup();
    transport
        .respond("/widget/1/delete/", r#"{"result": true, "message": "Dune deleted"}"#)
        .await;

    let dialog = opened(
        controller
            .handle(Trigger::Delete {
                url: "/widget/1/delete/".to_string(),
                object_name: "Dune".to_string(),
                title: "Delete Widget".to_string(),
            })
            .await
            .unwrap(),
    );
    assert_eq!(page.element(&dialog, "id_object_name").as_deref(), Some("Dune"));

    controller.submit(&dialog).await.unwrap();
    let sent = transport.submissions().await;
    assert_eq!(sent[0].url, "/widget/1/delete/");

    let result = DialogId::from("action-result-modal");
    let snapshot = page.dialog(&result).unwrap();
    assert!(snapshot.visible);
    assert_eq!(snapshot.title, "Delete Widget");
    assert_eq!(page.reload_count(), 0);

    controller.hide_dialog(&result).await.unwrap();
    assert_eq!(page.reload_count(), 1);
}

#[tokio::test]
async fn custom_action_posts_to_page_location() {
    let (controller, page, transport) = setup();
    transport
        .respond("/widget/", r#"{"result": false, "message": "Locked"}"#)
        .await;

    let outcome = controller
        .handle(Trigger::CustomAction {
            action: "0".to_string(),
            item: "4".to_string(),
            title: "Archive".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TriggerOutcome::ActionCompleted {
            result: false,
            message: "Locked".to_string()
        }
    );
    let sent = transport.submissions().await;
    assert_eq!(sent[0].field("csrfmiddlewaretoken"), Some("tok"));

    let result = DialogId::from("action-result-modal");
    controller.dialog_hidden(&result).await.unwrap();
    assert_eq!(page.reload_count(), 0);
}

#[tokio::test]
async fn transport_failure_is_shown_and_retryable() {
    let (controller, page, transport) = setup();
    transport.respond("/widget/new", WIDGET_FORM).await;
    transport
        .fail(
            "/widget/new",
            CrudError::Timeout {
                url: "/widget/new".to_string(),
            },
        )
        .await;
    transport.respond("/widget/new", "{}").await;

    let dialog = opened(
        controller
            .handle(Trigger::CreateEdit {
                url: "/widget/new".to_string(),
                title: "New Widget".to_string(),
            })
            .await
            .unwrap(),
    );

    let err = controller.submit(&dialog).await.unwrap_err();
    assert!(matches!(err, CrudError::Timeout { .. }));
    let snapshot = page.dialog(&dialog).unwrap();
    assert!(snapshot.visible);
    assert!(snapshot.error.is_some());
    assert_eq!(page.reload_count(), 0);

    controller.submit(&dialog).await.unwrap();
    assert_eq!(page.reload_count(), 1);
    assert_eq!(page.dialog(&dialog).unwrap().error, None);
}

#[tokio::test]
async fn nested_dialog_inside_nested_dialog() {
    let (controller, page, transport) = setup();
    let region_form = r#"<form id="create-edit-form" method="post" action="/region/new">
      <input type="text" name="name" value="North"></form>"#;
    let category_with_region = r#"<form id="create-edit-form" method="post" action="/category/new">
      <input type="text" name="name" value="Gadgets">
      <select name="region"><option value="">---</option></select>
      <a class="add-another" id="add_id_region" data-url="/region/new">Add Region</a>
    </form>"#;
    transport.respond("/widget/new", WIDGET_FORM).await;
    transport.respond("/category/new", category_with_region).await;
    transport.respond("/region/new", region_form).await;
    transport.respond("/region/new", r#"{"pk": 2, "name": "North"}"#).await;

    controller
        .handle(Trigger::CreateEdit {
            url: "/widget/new".to_string(),
            title: "New Widget".to_string(),
        })
        .await
        .unwrap();
    let category = opened(
        controller
            .handle(Trigger::AddAnother {
                trigger_id: "add_id_category".to_string(),
            })
            .await
            .unwrap(),
    );
    let region = opened(
        controller
            .handle(Trigger::AddAnother {
                trigger_id: "add_id_region".to_string(),
            })
            .await
            .unwrap(),
    );

    assert_eq!(controller.visible_dialogs().await.len(), 3);
    assert_eq!(controller.z_index_of(&region).await, Some(1060));

    controller.submit(&region).await.unwrap();
    let select = SelectRef::new(Container::from(&category), "region");
    assert_eq!(page.select(&select).unwrap().selected, vec!["2".to_string()]);
    assert!(page.dialog(&category).unwrap().visible);
}
