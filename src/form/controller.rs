use crate::form::dates::DateLink;
use crate::form::destinations::{self, DestinationPair};
use crate::form::document::FieldStore;
use crate::form::visibility::{GROUP_IDS, MessageType};
use tracing::{debug, info};

pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";

/// Input events the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A text field's value was committed.
    FieldChanged { id: String, value: String },
    /// A checkbox was clicked; `checked` is its state after the click.
    CheckboxToggled { id: String, checked: bool },
    /// A message-type radio was selected.
    OptionSelected { id: String },
}

/// Presentation changes produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetValue { id: String, value: String },
    SetChecked { id: String, checked: bool },
    SetVisible { group: String, visible: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    DateSync,
    Destination(String),
    Selector(MessageType),
}

#[derive(Debug, Default)]
pub struct SyncController {
    attached: bool,
    dates: Option<DateLink>,
    pairs: Vec<DestinationPair>,
    selectors: Vec<MessageType>,
    missing: Vec<String>,
}

impl SyncController {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Binds to the fields present in `store`. Only the first call has an
    /// effect; later calls return `false` and leave the bindings untouched.
    pub fn initialize<S: FieldStore + ?Sized>(&mut self, store: &S) -> bool {
        if self.attached {
            debug!("form controller already attached, ignoring");
            return false;
        }
        self.attached = true;

        match (store.value(START_DATE), store.value(END_DATE)) {
            (Some(start), Some(end)) => self.dates = Some(DateLink::new(start, end)),
            (start, end) => {
                if start.is_none() {
                    self.missing.push(START_DATE.to_string());
                }
                if end.is_none() {
                    self.missing.push(END_DATE.to_string());
                }
            }
        }

        for (id, name) in store.checkboxes() {
            let Some(destination) = destinations::destination_of(&name) else {
                continue;
            };
            let suppress_id = destinations::suppress_id(destination);
            if store.checked(&suppress_id).is_none() {
                self.missing.push(suppress_id);
                continue;
            }
            self.pairs.push(DestinationPair {
                destination: destination.to_string(),
                send_id: id,
                suppress_id,
            });
        }

        let groups_present = GROUP_IDS.iter().all(|group| store.has_group(group));
        if !groups_present {
            self.missing.extend(
                GROUP_IDS
                    .iter()
                    .filter(|group| !store.has_group(group))
                    .map(|group| group.to_string()),
            );
        }
        for message_type in MessageType::all() {
            if groups_present && store.has_field(message_type.selector_id()) {
                self.selectors.push(message_type);
            } else if !store.has_field(message_type.selector_id()) {
                self.missing.push(message_type.selector_id().to_string());
            }
        }

        info!(
            bindings = self.bindings().len(),
            missing = ?self.missing,
            "form controller attached"
        );
        true
    }

    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        if self.dates.is_some() {
            bindings.push(Binding::DateSync);
        }
        bindings.extend(
            self.pairs
                .iter()
                .map(|pair| Binding::Destination(pair.destination.clone())),
        );
        bindings.extend(self.selectors.iter().copied().map(Binding::Selector));
        bindings
    }

    /// Identifiers that were looked up at attach time but not found.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn dates(&self) -> Option<&DateLink> {
        self.dates.as_ref()
    }

    /// Runs the handler for `event` and applies its effects to `store`.
    /// Returns the effects that were applied.
    pub fn dispatch<S: FieldStore + ?Sized>(&mut self, store: &mut S, event: &FormEvent) -> Vec<Effect> {
        let effects = self.handle(event);
        for effect in &effects {
            apply(store, effect);
        }
        effects
    }

    /// Pure transition: advances the remembered state and reports the
    /// effects without touching any store.
    pub fn handle(&mut self, event: &FormEvent) -> Vec<Effect> {
        if !self.attached {
            return Vec::new();
        }
        match event {
            FormEvent::FieldChanged { id, value } => self.on_field_changed(id, value),
            FormEvent::CheckboxToggled { id, checked } => self.on_checkbox_toggled(id, *checked),
            FormEvent::OptionSelected { id } => self.on_option_selected(id),
        }
    }

    fn on_field_changed(&mut self, id: &str, value: &str) -> Vec<Effect> {
        let Some(dates) = self.dates.as_ref() else {
            return Vec::new();
        };
        match id {
            START_DATE => {
                self.dates = Some(dates.on_start_changed(value));
                Vec::new()
            }
            END_DATE => {
                let (next, start) = dates.on_end_changed(value);
                self.dates = Some(next);
                match start {
                    Some(start) => vec![Effect::SetValue {
                        id: START_DATE.to_string(),
                        value: start,
                    }],
                    None => {
                        debug!(end = value, "date interval not carried over");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn on_checkbox_toggled(&self, id: &str, checked: bool) -> Vec<Effect> {
        self.pairs
            .iter()
            .find_map(|pair| pair.side_of(id).map(|side| (pair, side)))
            .and_then(|(pair, side)| pair.on_toggle(side, checked))
            .map(|other| {
                vec![Effect::SetChecked {
                    id: other.to_string(),
                    checked: false,
                }]
            })
            .unwrap_or_default()
    }

    fn on_option_selected(&self, id: &str) -> Vec<Effect> {
        let Some(message_type) = MessageType::from_selector_id(id) else {
            return Vec::new();
        };
        if !self.selectors.contains(&message_type) {
            return Vec::new();
        }
        message_type
            .visibility()
            .entries()
            .iter()
            .map(|(group, visible)| Effect::SetVisible {
                group: group.to_string(),
                visible: *visible,
            })
            .collect()
    }
}

fn apply<S: FieldStore + ?Sized>(store: &mut S, effect: &Effect) {
    match effect {
        Effect::SetValue { id, value } => {
            store.set_value(id, value);
        }
        Effect::SetChecked { id, checked } => {
            store.set_checked(id, *checked);
        }
        Effect::SetVisible { group, visible } => {
            store.set_visible(group, *visible);
        }
    }
}
