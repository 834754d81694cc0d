//! Structured view of a fragment: forms, controls, add-another links and
//! addressable elements.

use std::collections::HashMap;

use super::markup::{self, Tag};

/// A `<form>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNode {
    pub id: Option<String>,
    pub method: Option<String>,
    pub action: Option<String>,
    /// Byte span from the start tag to the end of the closing tag
    span: (usize, usize),
}

impl FormNode {
    fn contains(&self, position: usize) -> bool {
        position >= self.span.0 && position < self.span.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox { checked: bool },
    Radio { checked: bool },
    /// submit, button, reset, image and file inputs, never serialized
    Excluded,
    Textarea,
}

/// An `<input>` or `<textarea>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub name: String,
    pub value: String,
    pub kind: FieldKind,
    pub disabled: bool,
    pub form: Option<usize>,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// A `<select>` control and its current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub name: String,
    pub multiple: bool,
    pub disabled: bool,
    pub options: Vec<SelectOption>,
    pub selected: Vec<String>,
    pub form: Option<usize>,
    position: usize,
}

impl SelectControl {
    /// Values submitted for this control: the selection, or the first option
    /// for a single select with nothing marked selected.
    pub fn submitted_values(&self) -> Vec<String> {
        if !self.selected.is_empty() || self.multiple {
            return self.selected.clone();
        }
        self.options
            .first()
            .map(|o| vec![o.value.clone()])
            .unwrap_or_default()
    }
}

/// An add-another link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub id: Option<String>,
    pub url: Option<String>,
    pub text: String,
    /// Index into `selects` of the closest select before the link
    pub select: Option<usize>,
}

/// Parsed content of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub forms: Vec<FormNode>,
    pub fields: Vec<FieldNode>,
    pub selects: Vec<SelectControl>,
    pub links: Vec<LinkNode>,
    /// Inner markup of every element with an id
    pub elements: HashMap<String, String>,
}

impl Fragment {
    pub fn parse(html: &str, link_class: &str) -> Self {
        let tags = markup::tags(html);
        let forms = parse_forms(html, &tags);
        let form_of = |position: usize| forms.iter().rposition(|f| f.contains(position));

        let mut fragment = Self {
            html: html.to_string(),
            ..Self::default()
        };

        for (index, tag) in tags.iter().enumerate() {
            if tag.closing {
                continue;
            }
            if let Some(id) = tag.attr("id") {
                let (start, end) = markup::content_range(html, &tags, index);
                fragment
                    .elements
                    .entry(id.to_string())
                    .or_insert_with(|| html[start..end].to_string());
            }
            match tag.name.as_str() {
                "input" => {
                    if let Some(field) = parse_input(tag, form_of(tag.start)) {
                        fragment.fields.push(field);
                    }
                }
                "textarea" => {
                    if let Some(name) = tag.attr("name") {
                        let (start, end) = markup::content_range(html, &tags, index);
                        fragment.fields.push(FieldNode {
                            name: name.to_string(),
                            value: markup::text_of(&html[start..end]),
                            kind: FieldKind::Textarea,
                            disabled: tag.has_attr("disabled"),
                            form: form_of(tag.start),
                            position: tag.start,
                        });
                    }
                }
                "select" => {
                    if let Some(select) = parse_select(html, &tags, index, form_of(tag.start)) {
                        fragment.selects.push(select);
                    }
                }
                "a" | "button" if tag.has_class(link_class) => {
                    let select = fragment.selects.iter().rposition(|s| s.position < tag.start);
                    fragment.links.push(LinkNode {
                        id: tag.attr("id").map(str::to_string),
                        url: tag.attr("data-url").map(str::to_string),
                        text: markup::inner_text(html, &tags, index),
                        select,
                    });
                }
                _ => {}
            }
        }

        fragment.forms = forms;
        fragment
    }

    /// Index of the form with `id`, or the first form when `id` is `None`.
    pub fn form_index(&self, id: Option<&str>) -> Option<usize> {
        match id {
            Some(id) => self.forms.iter().position(|f| f.id.as_deref() == Some(id)),
            None => (!self.forms.is_empty()).then_some(0),
        }
    }

    pub fn select_mut(&mut self, name: &str) -> Option<&mut SelectControl> {
        self.selects.iter_mut().find(|s| s.name == name)
    }

    pub fn select(&self, name: &str) -> Option<&SelectControl> {
        self.selects.iter().find(|s| s.name == name)
    }

    /// Successful controls of a form, in document order.
    pub fn serialize_form(&self, form: usize) -> Vec<(String, String)> {
        let mut entries: Vec<(usize, String, String)> = Vec::new();

        for field in self.fields.iter().filter(|f| f.form == Some(form) && !f.disabled) {
            let value = match field.kind {
                FieldKind::Excluded
                | FieldKind::Checkbox { checked: false }
                | FieldKind::Radio { checked: false } => continue,
                FieldKind::Checkbox { checked: true } | FieldKind::Radio { checked: true }
                    if field.value.is_empty() =>
                {
                    "on".to_string()
                }
                _ => field.value.clone(),
            };
            entries.push((field.position, field.name.clone(), value));
        }

        for select in self.selects.iter().filter(|s| s.form == Some(form) && !s.disabled) {
            for value in select.submitted_values() {
                entries.push((select.position, select.name.clone(), value));
            }
        }

        entries.sort_by_key(|(position, _, _)| *position);
        entries
            .into_iter()
            .map(|(_, name, value)| (name, value))
            .collect()
    }
}

fn parse_forms(html: &str, tags: &[Tag]) -> Vec<FormNode> {
    let mut forms = Vec::new();
    let mut from = 0;
    while let Some(index) = markup::find_open(tags, "form", from) {
        let tag = &tags[index];
        let end = markup::closing_index(tags, index).map_or(html.len(), |i| tags[i].end);
        forms.push(FormNode {
            id: tag.attr("id").map(str::to_string),
            method: tag.attr("method").map(str::to_string),
            action: tag.attr("action").map(str::to_string),
            span: (tag.start, end),
        });
        from = index + 1;
    }
    forms
}

fn parse_input(tag: &Tag, form: Option<usize>) -> Option<FieldNode> {
    let name = tag.attr("name")?;
    let checked = tag.has_attr("checked");
    let kind = match tag.attr("type").map(str::to_ascii_lowercase).as_deref() {
        Some("checkbox") => FieldKind::Checkbox { checked },
        Some("radio") => FieldKind::Radio { checked },
        Some("submit" | "button" | "reset" | "image" | "file") => FieldKind::Excluded,
        _ => FieldKind::Text,
    };
    Some(FieldNode {
        name: name.to_string(),
        value: tag.attr("value").unwrap_or_default().to_string(),
        kind,
        disabled: tag.has_attr("disabled"),
        form,
        position: tag.start,
    })
}

fn parse_select(html: &str, tags: &[Tag], index: usize, form: Option<usize>) -> Option<SelectControl> {
    let tag = &tags[index];
    let name = tag.attr("name")?;
    let close = markup::closing_index(tags, index).unwrap_or(tags.len());

    let mut options = Vec::new();
    let mut selected = Vec::new();
    for (i, option) in tags.iter().enumerate().take(close).skip(index + 1) {
        if !option.opens("option") {
            continue;
        }
        // Options are often left unclosed: the label runs to the next tag.
        let label_end = tags.get(i + 1).map_or(html.len(), |t| t.start);
        let label = markup::text_of(&html[option.end..label_end]);
        let value = option.attr("value").map_or_else(|| label.clone(), str::to_string);
        if option.has_attr("selected") {
            selected.push(value.clone());
        }
        options.push(SelectOption { value, label });
    }

    let multiple = tag.has_attr("multiple");
    if !multiple && selected.len() > 1 {
        selected.drain(..selected.len() - 1);
    }

    Some(SelectControl {
        name: name.to_string(),
        multiple,
        disabled: tag.has_attr("disabled"),
        options,
        selected,
        form,
        position: tag.start,
    })
}
