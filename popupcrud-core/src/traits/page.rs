//! Page (DOM) abstraction Trait

use crate::error::CrudResult;
use crate::types::{
    AddAnotherTrigger, BackdropId, Container, DialogId, EventTarget, FormHandle, SelectRef,
    SelectState,
};

/// Page Trait
///
/// Everything the controller reads from or writes to the document goes through
/// this trait. The dialog widget's own show/hide mechanics, the select widget
/// library and event delivery are the implementation's business.
///
/// All calls happen on the UI thread between suspension points, so
/// implementations may use interior mutability freely.
pub trait Page: Send + Sync {
    /// URL of the current page (endpoint for custom actions)
    fn location(&self) -> String;

    /// Raw `document.cookie` string
    fn cookies(&self) -> String;

    fn dialog_exists(&self, id: &DialogId) -> bool;

    /// Clone the template dialog under a new id with empty title and body,
    /// appended to the document root.
    fn clone_dialog(&self, template: &DialogId, id: &DialogId) -> CrudResult<()>;

    fn set_dialog_title(&self, id: &DialogId, title: &str) -> CrudResult<()>;

    /// Replace the dialog body and return the generation of the new content.
    fn set_dialog_body(&self, id: &DialogId, html: &str) -> CrudResult<u64>;

    /// Generation of the content currently in the container.
    fn content_generation(&self, container: &Container) -> CrudResult<u64>;

    /// Show or clear an error message in the dialog, outside the body content.
    fn set_dialog_error(&self, id: &DialogId, message: Option<&str>) -> CrudResult<()>;

    /// Set the text content of the element `element_id` inside the dialog.
    fn set_element_text(&self, id: &DialogId, element_id: &str, text: &str) -> CrudResult<()>;

    /// Set the inner markup of the element `element_id` inside the dialog.
    fn set_element_html(&self, id: &DialogId, element_id: &str, html: &str) -> CrudResult<()>;

    fn set_form_action(&self, id: &DialogId, form_id: &str, action: &str) -> CrudResult<()>;

    /// Find a form in the container: the one with `form_id`, or the first form.
    fn find_form(&self, container: &Container, form_id: Option<&str>) -> Option<FormHandle>;

    /// Successful controls of the form, as `application/x-www-form-urlencoded` pairs.
    fn serialize_form(&self, form: &FormHandle) -> CrudResult<Vec<(String, String)>>;

    /// Links carrying `class` inside the container.
    fn add_another_triggers(&self, container: &Container, class: &str) -> Vec<AddAnotherTrigger>;

    fn set_dialog_z_index(&self, id: &DialogId, z_index: u32) -> CrudResult<()>;

    fn show_dialog(&self, id: &DialogId) -> CrudResult<()>;

    fn hide_dialog(&self, id: &DialogId) -> CrudResult<()>;

    /// Backdrops inserted for `owner` that have no stacking order yet.
    fn unstacked_backdrops(&self, owner: &DialogId) -> Vec<BackdropId>;

    /// Apply a stacking order to a backdrop and mark it stacked.
    fn stack_backdrop(&self, backdrop: BackdropId, z_index: u32);

    /// Initialise the select widget library on controls inside the container.
    fn bind_select_widgets(&self, container: &Container);

    fn select_state(&self, select: &SelectRef) -> CrudResult<SelectState>;

    fn append_option(&self, select: &SelectRef, value: &str, label: &str) -> CrudResult<()>;

    fn set_selected(&self, select: &SelectRef, values: &[String]) -> CrudResult<()>;

    /// Raise a synthetic event for subscribers.
    fn dispatch_event(&self, target: &EventTarget, name: &str);

    /// Reload the whole page.
    fn reload(&self);
}
