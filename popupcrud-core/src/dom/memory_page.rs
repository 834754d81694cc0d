//! In-memory page
//!
//! A headless document holding the page root and its dialogs. Used by tests
//! and by hosts that render dialogs themselves from snapshots.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::fragment::Fragment;
use super::markup;
use crate::config::CrudConfig;
use crate::error::{CrudError, CrudResult};
use crate::traits::Page;
use crate::types::{
    AddAnotherTrigger, BackdropId, Container, DialogId, EventTarget, FormHandle, HttpMethod,
    SelectRef, SelectState,
};

/// A synthetic event raised through [`Page::dispatch_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: EventTarget,
    pub name: String,
}

/// Observable state of a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub id: DialogId,
    pub title: String,
    /// Markup as loaded. Later changes to selects, form actions and elements
    /// are only visible through [`MemoryPage::select`] and
    /// [`MemoryPage::element`].
    pub body: String,
    pub visible: bool,
    pub z_index: Option<u32>,
    pub error: Option<String>,
    pub generation: u64,
}

/// Observable state of a backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackdropSnapshot {
    pub id: BackdropId,
    pub z_index: Option<u32>,
    pub stacked: bool,
}

/// Observable state of a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectSnapshot {
    pub multiple: bool,
    /// `(value, label)` pairs
    pub options: Vec<(String, String)>,
    pub selected: Vec<String>,
}

#[derive(Debug, Clone)]
struct Content {
    fragment: Fragment,
    generation: u64,
}

#[derive(Debug, Clone)]
struct DialogNode {
    id: DialogId,
    title: String,
    content: Content,
    visible: bool,
    z_index: Option<u32>,
    error: Option<String>,
}

#[derive(Debug)]
struct Backdrop {
    id: BackdropId,
    owner: DialogId,
    z_index: Option<u32>,
    stacked: bool,
}

#[derive(Debug)]
struct Document {
    location: String,
    cookies: String,
    link_class: String,
    root: Content,
    dialogs: Vec<DialogNode>,
    backdrops: Vec<Backdrop>,
    next_backdrop: u64,
    next_generation: u64,
    events: Vec<DispatchedEvent>,
    widget_bindings: Vec<Container>,
    reloads: usize,
}

impl Document {
    fn parse(&mut self, html: &str) -> Content {
        self.next_generation += 1;
        Content {
            fragment: Fragment::parse(html, &self.link_class),
            generation: self.next_generation,
        }
    }

    fn dialog(&self, id: &DialogId) -> CrudResult<&DialogNode> {
        self.dialogs
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| CrudError::DialogNotFound(id.clone()))
    }

    fn dialog_mut(&mut self, id: &DialogId) -> CrudResult<&mut DialogNode> {
        self.dialogs
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| CrudError::DialogNotFound(id.clone()))
    }

    fn content(&self, container: &Container) -> CrudResult<&Content> {
        match container {
            Container::Root => Ok(&self.root),
            Container::Dialog(id) => self.dialog(id).map(|d| &d.content),
        }
    }

    fn content_mut(&mut self, container: &Container) -> CrudResult<&mut Content> {
        match container {
            Container::Root => Ok(&mut self.root),
            Container::Dialog(id) => self.dialog_mut(id).map(|d| &mut d.content),
        }
    }
}

/// Builder for [`MemoryPage`]
#[derive(Debug)]
pub struct MemoryPageBuilder {
    location: String,
    cookies: String,
    link_class: String,
    root: String,
    dialogs: Vec<(DialogId, String, String)>,
}

impl MemoryPageBuilder {
    #[must_use]
    pub fn location(mut self, url: impl Into<String>) -> Self {
        self.location = url.into();
        self
    }

    #[must_use]
    pub fn cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = cookies.into();
        self
    }

    /// Markup of the page outside any dialog.
    #[must_use]
    pub fn root(mut self, html: impl Into<String>) -> Self {
        self.root = html.into();
        self
    }

    /// Add a hidden dialog with the given title and body markup.
    #[must_use]
    pub fn dialog(
        mut self,
        id: impl Into<DialogId>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.dialogs.push((id.into(), title.into(), body.into()));
        self
    }

    /// Add the dialogs a list page renders with the stock templates.
    #[must_use]
    pub fn standard_dialogs(self, config: &CrudConfig) -> Self {
        let delete_body = format!(
            r#"<p>Delete <strong id="{}"></strong>?</p><form id="{}" method="post" action=""><input type="hidden" name="csrfmiddlewaretoken" value=""></form>"#,
            config.elements.object_name, config.forms.delete,
        );
        let result_body = format!(r#"<div id="{}"></div>"#, config.elements.action_result);
        self.dialog(config.dialogs.create_edit.as_str(), "", "")
            .dialog(config.dialogs.detail.as_str(), "", "")
            .dialog(config.dialogs.delete.as_str(), "Delete", delete_body)
            .dialog(config.dialogs.action_result.as_str(), "", result_body)
            .dialog(config.dialogs.related_template.as_str(), "", "")
    }

    #[must_use]
    pub fn build(self) -> MemoryPage {
        let mut document = Document {
            location: self.location,
            cookies: self.cookies,
            link_class: self.link_class,
            root: Content {
                fragment: Fragment::default(),
                generation: 0,
            },
            dialogs: Vec::new(),
            backdrops: Vec::new(),
            next_backdrop: 0,
            next_generation: 0,
            events: Vec::new(),
            widget_bindings: Vec::new(),
            reloads: 0,
        };
        document.root = document.parse(&self.root);
        for (id, title, body) in self.dialogs {
            let content = document.parse(&body);
            document.dialogs.push(DialogNode {
                id,
                title,
                content,
                visible: false,
                z_index: None,
                error: None,
            });
        }
        MemoryPage {
            document: Mutex::new(document),
        }
    }
}

/// In-memory [`Page`] implementation
#[derive(Debug)]
pub struct MemoryPage {
    document: Mutex<Document>,
}

impl MemoryPage {
    #[must_use]
    pub fn builder() -> MemoryPageBuilder {
        MemoryPageBuilder {
            location: "/".to_string(),
            cookies: String::new(),
            link_class: CrudConfig::default().triggers.add_another_class,
            root: String::new(),
            dialogs: Vec::new(),
        }
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dialog(&self, id: &DialogId) -> Option<DialogSnapshot> {
        let doc = self.doc();
        let node = doc.dialog(id).ok()?;
        Some(DialogSnapshot {
            id: node.id.clone(),
            title: node.title.clone(),
            body: node.content.fragment.html.clone(),
            visible: node.visible,
            z_index: node.z_index,
            error: node.error.clone(),
            generation: node.content.generation,
        })
    }

    /// Ids of all dialogs in document order, duplicates included.
    pub fn dialog_ids(&self) -> Vec<DialogId> {
        self.doc().dialogs.iter().map(|d| d.id.clone()).collect()
    }

    pub fn backdrops(&self) -> Vec<BackdropSnapshot> {
        self.doc()
            .backdrops
            .iter()
            .map(|b| BackdropSnapshot {
                id: b.id,
                z_index: b.z_index,
                stacked: b.stacked,
            })
            .collect()
    }

    pub fn select(&self, select: &SelectRef) -> Option<SelectSnapshot> {
        let doc = self.doc();
        let control = doc.content(&select.container).ok()?.fragment.select(&select.name)?;
        Some(SelectSnapshot {
            multiple: control.multiple,
            options: control
                .options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone()))
                .collect(),
            selected: control.selected.clone(),
        })
    }

    /// Inner markup of an element inside a dialog.
    pub fn element(&self, id: &DialogId, element_id: &str) -> Option<String> {
        let doc = self.doc();
        doc.dialog(id)
            .ok()?
            .content
            .fragment
            .elements
            .get(element_id)
            .cloned()
    }

    /// Simulate user input: set the value of a named control in a form.
    pub fn fill(
        &self,
        container: &Container,
        form_id: Option<&str>,
        name: &str,
        value: &str,
    ) -> CrudResult<()> {
        let mut doc = self.doc();
        let fragment = &mut doc.content_mut(container)?.fragment;
        let form = fragment
            .form_index(form_id)
            .ok_or_else(|| form_not_found(container, form_id))?;
        if let Some(field) = fragment
            .fields
            .iter_mut()
            .find(|f| f.form == Some(form) && f.name == name)
        {
            field.value = value.to_string();
            return Ok(());
        }
        if let Some(select) = fragment
            .selects
            .iter_mut()
            .find(|s| s.form == Some(form) && s.name == name)
        {
            select.selected = vec![value.to_string()];
            return Ok(());
        }
        Err(CrudError::MarkupError(format!(
            "no control named {name} in form"
        )))
    }

    pub fn events(&self) -> Vec<DispatchedEvent> {
        self.doc().events.clone()
    }

    /// Events with the given name, in dispatch order.
    pub fn events_named(&self, name: &str) -> Vec<EventTarget> {
        self.doc()
            .events
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.target.clone())
            .collect()
    }

    pub fn widget_bindings(&self) -> Vec<Container> {
        self.doc().widget_bindings.clone()
    }

    pub fn reload_count(&self) -> usize {
        self.doc().reloads
    }
}

fn form_not_found(container: &Container, form_id: Option<&str>) -> CrudError {
    CrudError::FormNotFound {
        dialog: container
            .dialog()
            .cloned()
            .unwrap_or_else(|| DialogId::from("<root>")),
        form_id: form_id.unwrap_or("<first>").to_string(),
    }
}

fn missing_element(id: &DialogId, element_id: &str) -> CrudError {
    CrudError::MarkupError(format!("element #{element_id} not found in dialog {id}"))
}

fn missing_select(select: &SelectRef) -> CrudError {
    CrudError::MarkupError(format!("select {} not found", select.name))
}

impl Page for MemoryPage {
    fn location(&self) -> String {
        self.doc().location.clone()
    }

    fn cookies(&self) -> String {
        self.doc().cookies.clone()
    }

    fn dialog_exists(&self, id: &DialogId) -> bool {
        self.doc().dialog(id).is_ok()
    }

    fn clone_dialog(&self, template: &DialogId, id: &DialogId) -> CrudResult<()> {
        let mut doc = self.doc();
        let mut node = doc.dialog(template)?.clone();
        node.id = id.clone();
        node.title.clear();
        node.visible = false;
        node.z_index = None;
        node.error = None;
        node.content = doc.parse("");
        doc.dialogs.push(node);
        Ok(())
    }

    fn set_dialog_title(&self, id: &DialogId, title: &str) -> CrudResult<()> {
        self.doc().dialog_mut(id)?.title = title.to_string();
        Ok(())
    }

    fn set_dialog_body(&self, id: &DialogId, html: &str) -> CrudResult<u64> {
        let mut doc = self.doc();
        doc.dialog(id)?;
        let content = doc.parse(html);
        let generation = content.generation;
        doc.dialog_mut(id)?.content = content;
        Ok(generation)
    }

    fn content_generation(&self, container: &Container) -> CrudResult<u64> {
        Ok(self.doc().content(container)?.generation)
    }

    fn set_dialog_error(&self, id: &DialogId, message: Option<&str>) -> CrudResult<()> {
        self.doc().dialog_mut(id)?.error = message.map(str::to_string);
        Ok(())
    }

    fn set_element_text(&self, id: &DialogId, element_id: &str, text: &str) -> CrudResult<()> {
        self.set_element_html(id, element_id, &markup::escape(text))
    }

    fn set_element_html(&self, id: &DialogId, element_id: &str, html: &str) -> CrudResult<()> {
        let mut doc = self.doc();
        let slot = doc
            .dialog_mut(id)?
            .content
            .fragment
            .elements
            .get_mut(element_id)
            .ok_or_else(|| missing_element(id, element_id))?;
        *slot = html.to_string();
        Ok(())
    }

    fn set_form_action(&self, id: &DialogId, form_id: &str, action: &str) -> CrudResult<()> {
        let mut doc = self.doc();
        let fragment = &mut doc.dialog_mut(id)?.content.fragment;
        let index = fragment
            .form_index(Some(form_id))
            .ok_or_else(|| CrudError::FormNotFound {
                dialog: id.clone(),
                form_id: form_id.to_string(),
            })?;
        fragment.forms[index].action = Some(action.to_string());
        Ok(())
    }

    fn find_form(&self, container: &Container, form_id: Option<&str>) -> Option<FormHandle> {
        let doc = self.doc();
        let content = doc.content(container).ok()?;
        let form = &content.fragment.forms[content.fragment.form_index(form_id)?];
        // An empty or missing action submits to the page itself.
        let action = form
            .action
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| doc.location.clone());
        Some(FormHandle {
            container: container.clone(),
            id: form.id.clone(),
            method: HttpMethod::from_attr(form.method.as_deref()),
            action,
            generation: content.generation,
        })
    }

    fn serialize_form(&self, form: &FormHandle) -> CrudResult<Vec<(String, String)>> {
        let doc = self.doc();
        let content = doc.content(&form.container)?;
        if content.generation != form.generation {
            return Err(CrudError::StaleForm {
                dialog: form
                    .dialog()
                    .cloned()
                    .unwrap_or_else(|| DialogId::from("<root>")),
                armed: form.generation,
                current: content.generation,
            });
        }
        let index = content
            .fragment
            .form_index(form.id.as_deref())
            .ok_or_else(|| form_not_found(&form.container, form.id.as_deref()))?;
        Ok(content.fragment.serialize_form(index))
    }

    fn add_another_triggers(&self, container: &Container, class: &str) -> Vec<AddAnotherTrigger> {
        let doc = self.doc();
        let Ok(content) = doc.content(container) else {
            return Vec::new();
        };
        let rescanned;
        let links = if class == doc.link_class {
            &content.fragment.links
        } else {
            rescanned = Fragment::parse(&content.fragment.html, class);
            &rescanned.links
        };
        // Select indices match between scans of the same markup; names come
        // from the live controls.
        let live = &content.fragment.selects;
        links
            .iter()
            .map(|link| AddAnotherTrigger {
                id: link.id.clone().unwrap_or_default(),
                url: link.url.clone().unwrap_or_default(),
                text: link.text.clone(),
                select: link
                    .select
                    .and_then(|i| live.get(i))
                    .map(|control| SelectRef::new(container.clone(), control.name.clone())),
            })
            .collect()
    }

    fn set_dialog_z_index(&self, id: &DialogId, z_index: u32) -> CrudResult<()> {
        self.doc().dialog_mut(id)?.z_index = Some(z_index);
        Ok(())
    }

    fn show_dialog(&self, id: &DialogId) -> CrudResult<()> {
        let mut doc = self.doc();
        let node = doc.dialog_mut(id)?;
        if node.visible {
            return Ok(());
        }
        node.visible = true;
        doc.next_backdrop += 1;
        let backdrop = BackdropId(doc.next_backdrop);
        doc.backdrops.push(Backdrop {
            id: backdrop,
            owner: id.clone(),
            z_index: None,
            stacked: false,
        });
        Ok(())
    }

    fn hide_dialog(&self, id: &DialogId) -> CrudResult<()> {
        let mut doc = self.doc();
        doc.dialog_mut(id)?.visible = false;
        doc.backdrops.retain(|b| &b.owner != id);
        Ok(())
    }

    fn unstacked_backdrops(&self, owner: &DialogId) -> Vec<BackdropId> {
        self.doc()
            .backdrops
            .iter()
            .filter(|b| !b.stacked && &b.owner == owner)
            .map(|b| b.id)
            .collect()
    }

    fn stack_backdrop(&self, backdrop: BackdropId, z_index: u32) {
        if let Some(b) = self.doc().backdrops.iter_mut().find(|b| b.id == backdrop) {
            b.z_index = Some(z_index);
            b.stacked = true;
        }
    }

    fn bind_select_widgets(&self, container: &Container) {
        self.doc().widget_bindings.push(container.clone());
    }

    fn select_state(&self, select: &SelectRef) -> CrudResult<SelectState> {
        let doc = self.doc();
        let control = doc
            .content(&select.container)?
            .fragment
            .select(&select.name)
            .ok_or_else(|| missing_select(select))?;
        Ok(SelectState {
            multiple: control.multiple,
            selected: control.selected.clone(),
        })
    }

    fn append_option(&self, select: &SelectRef, value: &str, label: &str) -> CrudResult<()> {
        let mut doc = self.doc();
        let control = doc
            .content_mut(&select.container)?
            .fragment
            .select_mut(&select.name)
            .ok_or_else(|| missing_select(select))?;
        control.options.push(super::fragment::SelectOption {
            value: value.to_string(),
            label: label.to_string(),
        });
        Ok(())
    }

    fn set_selected(&self, select: &SelectRef, values: &[String]) -> CrudResult<()> {
        let mut doc = self.doc();
        let control = doc
            .content_mut(&select.container)?
            .fragment
            .select_mut(&select.name)
            .ok_or_else(|| missing_select(select))?;
        // Like the DOM, values without a matching option are ignored.
        let known: Vec<String> = values
            .iter()
            .filter(|v| control.options.iter().any(|o| &o.value == *v))
            .cloned()
            .collect();
        control.selected = if control.multiple {
            known
        } else {
            known.last().cloned().into_iter().collect()
        };
        Ok(())
    }

    fn dispatch_event(&self, target: &EventTarget, name: &str) {
        log::trace!("dispatch {name} on {target:?}");
        self.doc().events.push(DispatchedEvent {
            target: target.clone(),
            name: name.to_string(),
        });
    }

    fn reload(&self) {
        self.doc().reloads += 1;
    }
}
