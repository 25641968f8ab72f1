use std::collections::HashMap;

/// Access to the live field values of a loaded form.
///
/// Lookups are permissive: every accessor returns `None`/`false` for an
/// unknown identifier instead of failing, so callers can probe for optional
/// fields.
pub trait FieldStore {
    fn has_field(&self, id: &str) -> bool;
    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    fn checked(&self, id: &str) -> Option<bool>;
    fn set_checked(&mut self, id: &str, checked: bool) -> bool;
    fn has_group(&self, id: &str) -> bool;
    fn set_visible(&mut self, group: &str, visible: bool) -> bool;
    /// `(id, name)` of every checkbox in document order.
    fn checkboxes(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(String),
    Date(String),
    Time(String),
    TextArea(String),
    Checkbox(bool),
    Radio { value: String, checked: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(id: &str, label: &str, value: impl Into<String>) -> Self {
        Self::new(id, id, label, FieldKind::Text(value.into()))
    }

    pub fn date(id: &str, label: &str, value: impl Into<String>) -> Self {
        Self::new(id, id, label, FieldKind::Date(value.into()))
    }

    pub fn time(id: &str, label: &str, value: impl Into<String>) -> Self {
        Self::new(id, id, label, FieldKind::Time(value.into()))
    }

    pub fn text_area(id: &str, label: &str, value: impl Into<String>) -> Self {
        Self::new(id, id, label, FieldKind::TextArea(value.into()))
    }

    pub fn checkbox(id: &str, name: &str, label: &str, checked: bool) -> Self {
        Self::new(id, name, label, FieldKind::Checkbox(checked))
    }

    pub fn radio(id: &str, name: &str, value: &str, label: &str, checked: bool) -> Self {
        Self::new(
            id,
            name,
            label,
            FieldKind::Radio {
                value: value.to_string(),
                checked,
            },
        )
    }

    fn new(id: &str, name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    pub fn is_editable_text(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text(_) | FieldKind::Date(_) | FieldKind::Time(_) | FieldKind::TextArea(_)
        )
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::TextArea(_))
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Text(v) | FieldKind::Date(v) | FieldKind::Time(v) | FieldKind::TextArea(v) => {
                Some(v)
            }
            FieldKind::Radio { value, .. } => Some(value),
            FieldKind::Checkbox(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormRow {
    /// Group identifier used for show/hide; most rows have none.
    pub id: Option<String>,
    pub label: String,
    pub help: Option<String>,
    pub visible: bool,
    pub fields: Vec<Field>,
}

impl FormRow {
    pub fn new(label: &str, fields: Vec<Field>) -> Self {
        Self {
            id: None,
            label: label.to_string(),
            help: None,
            visible: true,
            fields,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.visible = !hidden;
        self
    }
}

/// In-memory form: an ordered list of rows plus an id index over fields.
#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    rows: Vec<FormRow>,
    index: HashMap<String, (usize, usize)>,
    groups: HashMap<String, usize>,
}

impl FormDocument {
    pub fn new(rows: Vec<FormRow>) -> Self {
        let mut doc = Self {
            rows,
            ..Default::default()
        };
        doc.reindex();
        doc
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.groups.clear();
        for (r, row) in self.rows.iter().enumerate() {
            if let Some(id) = &row.id {
                self.groups.insert(id.clone(), r);
            }
            for (f, field) in row.fields.iter().enumerate() {
                // First occurrence wins, like getElementById.
                self.index.entry(field.id.clone()).or_insert((r, f));
            }
        }
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        let (r, f) = *self.index.get(id)?;
        self.rows.get(r)?.fields.get(f)
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut Field> {
        let (r, f) = *self.index.get(id)?;
        self.rows.get_mut(r)?.fields.get_mut(f)
    }

    pub fn field_at(&self, row: usize, field: usize) -> Option<&Field> {
        self.rows.get(row)?.fields.get(field)
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.visible)
    }

    #[cfg(test)]
    pub fn is_group_visible(&self, id: &str) -> Option<bool> {
        self.groups.get(id).map(|&r| self.rows[r].visible)
    }

    /// Marks the radio `id` checked and clears the others sharing its name.
    pub fn select_radio(&mut self, id: &str) -> bool {
        let Some(name) = self.field(id).and_then(|field| match field.kind {
            FieldKind::Radio { .. } => Some(field.name.clone()),
            _ => None,
        }) else {
            return false;
        };
        for row in &mut self.rows {
            for field in &mut row.fields {
                if field.name == name
                    && let FieldKind::Radio { checked, .. } = &mut field.kind
                {
                    *checked = field.id == id;
                }
            }
        }
        true
    }

    /// Id of the checked radio in the group `name`, if any.
    pub fn selected_radio(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.fields.iter())
            .find(|field| {
                field.name == name && matches!(field.kind, FieldKind::Radio { checked: true, .. })
            })
            .map(|field| field.id.as_str())
    }

    /// Values of every checked checkbox carrying `name`.
    pub fn checked_values(&self, name: &str) -> Vec<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.fields.iter())
            .filter(|field| field.name == name && matches!(field.kind, FieldKind::Checkbox(true)))
            .map(|field| field.id.rsplit('.').next().unwrap_or(field.id.as_str()))
            .collect()
    }
}

impl FieldStore for FormDocument {
    fn has_field(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn value(&self, id: &str) -> Option<String> {
        self.field(id)
            .and_then(|field| field.text_value())
            .map(str::to_string)
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        match &mut field.kind {
            FieldKind::Text(v) | FieldKind::Date(v) | FieldKind::Time(v) | FieldKind::TextArea(v) => {
                *v = value.to_string();
                true
            }
            _ => false,
        }
    }

    fn checked(&self, id: &str) -> Option<bool> {
        match self.field(id)?.kind {
            FieldKind::Checkbox(checked) => Some(checked),
            FieldKind::Radio { checked, .. } => Some(checked),
            _ => None,
        }
    }

    fn set_checked(&mut self, id: &str, value: bool) -> bool {
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        match &mut field.kind {
            FieldKind::Checkbox(checked) => {
                *checked = value;
                true
            }
            FieldKind::Radio { checked, .. } => {
                *checked = value;
                true
            }
            _ => false,
        }
    }

    fn has_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    fn set_visible(&mut self, group: &str, visible: bool) -> bool {
        let Some(&r) = self.groups.get(group) else {
            return false;
        };
        self.rows[r].visible = visible;
        true
    }

    fn checkboxes(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .flat_map(|row| row.fields.iter())
            .filter(|field| matches!(field.kind, FieldKind::Checkbox(_)))
            .map(|field| (field.id.clone(), field.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormDocument {
        FormDocument::new(vec![
            FormRow::new("Start", vec![Field::date("startDate", "Start", "2024-01-01")]),
            FormRow::new(
                "Message",
                vec![
                    Field::radio("anyMessage", "messageType", "any", "Any", true),
                    Field::radio("plainMessage", "messageType", "plain", "Plain", false),
                ],
            ),
            FormRow::new(
                "Types",
                vec![
                    Field::checkbox("mtype.plain", "mtype", "Plain", true),
                    Field::checkbox("mtype.ICS213", "mtype", "ICS-213", false),
                ],
            )
            .with_id("mtypeRow"),
        ])
    }

    #[test]
    fn unknown_ids_are_absorbed() {
        let mut doc = sample();
        assert!(!doc.has_field("endDate"));
        assert_eq!(doc.value("endDate"), None);
        assert!(!doc.set_value("endDate", "2024-01-02"));
        assert!(!doc.set_checked("nope", true));
        assert!(!doc.set_visible("formBodyRow", true));
    }

    #[test]
    fn set_value_only_touches_text_fields() {
        let mut doc = sample();
        assert!(doc.set_value("startDate", "2024-02-02"));
        assert_eq!(doc.value("startDate").as_deref(), Some("2024-02-02"));
        assert!(!doc.set_value("mtype.plain", "x"));
    }

    #[test]
    fn select_radio_clears_siblings() {
        let mut doc = sample();
        assert!(doc.select_radio("plainMessage"));
        assert_eq!(doc.selected_radio("messageType"), Some("plainMessage"));
        assert_eq!(doc.checked("anyMessage"), Some(false));
        assert!(!doc.select_radio("mtype.plain"));
    }

    #[test]
    fn groups_toggle_row_visibility() {
        let mut doc = sample();
        assert_eq!(doc.is_group_visible("mtypeRow"), Some(true));
        assert!(doc.set_visible("mtypeRow", false));
        assert_eq!(doc.is_group_visible("mtypeRow"), Some(false));
        assert!(!doc.is_row_visible(2));
    }

    #[test]
    fn checkboxes_lists_checkbox_fields_in_order() {
        let doc = sample();
        let boxes = doc.checkboxes();
        assert_eq!(
            boxes,
            vec![
                ("mtype.plain".to_string(), "mtype".to_string()),
                ("mtype.ICS213".to_string(), "mtype".to_string()),
            ]
        );
        assert_eq!(doc.checked_values("mtype"), vec!["plain"]);
    }
}
