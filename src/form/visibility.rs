use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Any,
    Plain,
    Form,
}

impl MessageType {
    pub fn all() -> [MessageType; 3] {
        [MessageType::Any, MessageType::Plain, MessageType::Form]
    }

    /// Id of the radio that selects this type.
    pub fn selector_id(self) -> &'static str {
        match self {
            MessageType::Any => "anyMessage",
            MessageType::Plain => "plainMessage",
            MessageType::Form => "formMessage",
        }
    }

    pub fn from_selector_id(id: &str) -> Option<MessageType> {
        Self::all().into_iter().find(|t| t.selector_id() == id)
    }

    /// Value submitted for the `messageType` radio group.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Any => "any",
            MessageType::Plain => "plain",
            MessageType::Form => "form",
        }
    }

    pub fn visibility(self) -> VisibilityVector {
        let (mtype, plain, form) = match self {
            MessageType::Any => (true, false, false),
            MessageType::Plain => (false, true, false),
            MessageType::Form => (false, false, true),
        };
        VisibilityVector {
            mtype_row: mtype,
            plain_subject_row: plain,
            plain_body_row: plain,
            form_body_row: form,
            form_image_row: form,
        }
    }
}

pub const MTYPE_ROW: &str = "mtypeRow";
pub const PLAIN_SUBJECT_ROW: &str = "plainSubjectRow";
pub const PLAIN_BODY_ROW: &str = "plainBodyRow";
pub const FORM_BODY_ROW: &str = "formBodyRow";
pub const FORM_IMAGE_ROW: &str = "formImageRow";

pub const GROUP_IDS: [&str; 5] = [
    MTYPE_ROW,
    PLAIN_SUBJECT_ROW,
    PLAIN_BODY_ROW,
    FORM_BODY_ROW,
    FORM_IMAGE_ROW,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityVector {
    pub mtype_row: bool,
    pub plain_subject_row: bool,
    pub plain_body_row: bool,
    pub form_body_row: bool,
    pub form_image_row: bool,
}

impl VisibilityVector {
    /// `(group id, shown)` for all five groups, in fixed order.
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            (MTYPE_ROW, self.mtype_row),
            (PLAIN_SUBJECT_ROW, self.plain_subject_row),
            (PLAIN_BODY_ROW, self.plain_body_row),
            (FORM_BODY_ROW, self.form_body_row),
            (FORM_IMAGE_ROW, self.form_image_row),
        ]
    }
}
