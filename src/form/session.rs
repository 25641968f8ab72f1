use crate::config::FormConfig;
use crate::date_input::parse_relative_date_input;
use crate::form::controller::{END_DATE, START_DATE};
use crate::form::destinations::{SEND_PREFIX, SUPPRESS_PREFIX};
use crate::form::document::{Field, FormDocument, FormRow};
use crate::form::visibility::{
    FORM_BODY_ROW, FORM_IMAGE_ROW, MTYPE_ROW, MessageType, PLAIN_BODY_ROW, PLAIN_SUBJECT_ROW,
};
use chrono::{Duration, NaiveDate};

pub const MESSAGE_TYPE_NAME: &str = "messageType";
const DEFAULT_PLAIN_SUBJECT: &str = "XXX-###P_";

/// Builds the session editor page, pre-filled from the configured defaults.
/// Group visibility follows the pre-selected message type.
pub fn session_editor(config: &FormConfig, today: NaiveDate) -> FormDocument {
    let start = seed_date(config.start_date.as_deref(), today).unwrap_or(today);
    let end = seed_date(config.end_date.as_deref(), today).unwrap_or_else(|| {
        Duration::try_days(config.session_days)
            .and_then(|days| start.checked_add_signed(days))
            .unwrap_or(start)
    });
    let selected = config.message_type;
    let shown = selected.visibility();

    let mut rows = vec![
        FormRow::new(
            "Start at",
            vec![
                Field::date(START_DATE, "Date", start.format("%Y-%m-%d").to_string()),
                Field::time("startTime", "Time", config.start_time.clone()),
            ],
        )
        .with_help("Date and time when we start accepting practice messages for this session."),
        FormRow::new(
            "End at",
            vec![
                Field::date(END_DATE, "Date", end.format("%Y-%m-%d").to_string()),
                Field::time("endTime", "Time", config.end_time.clone()),
            ],
        )
        .with_help(
            "Date and time when we stop accepting practice messages for this session. \
             The session report will be sent at this time.",
        ),
        FormRow::new(
            "Session name",
            vec![Field::text("name", "Name", config.name.clone())],
        )
        .with_help(
            "Name of the practice session. Usually this is the name of the net that \
             participants are checking into. Do not include the date.",
        ),
        FormRow::new(
            "Call sign",
            vec![Field::text("callsign", "Call sign", config.call_sign.clone())],
        )
        .with_help("Call sign to which practice messages must be addressed."),
        FormRow::new(
            "Message number prefix",
            vec![Field::text("prefix", "Prefix", config.prefix.clone())],
        )
        .with_help("Three-character message number prefix corresponding to call sign."),
        FormRow::new(
            "Exclude from Week",
            vec![Field::checkbox("exclude", "exclude", "Exclude", false)],
        )
        .with_help("Exclude this session from weekly check-in counts."),
        FormRow::new(
            "Packet Reports",
            vec![
                Field::text_area("reportToText", "Addresses", ""),
                Field::checkbox("reportToSenders", "reportToSenders", "Message senders", false),
            ],
        )
        .with_help("Packet addresses to which the plain text session report should be sent (one per line)."),
        FormRow::new(
            "Email Reports",
            vec![Field::text_area("reportToHTML", "Addresses", "")],
        )
        .with_help("Email addresses to which the HTML session report should be sent (one per line)."),
    ];

    for bbs in &config.bbses {
        let send = config.to_bbses.contains(bbs);
        let suppress = !send && config.down_bbses.contains(bbs);
        let send_id = format!("{SEND_PREFIX}{bbs}");
        let suppress_id = format!("{SUPPRESS_PREFIX}{bbs}");
        let retrieve_id = format!("retrieve.{bbs}");
        rows.push(FormRow::new(
            &format!("BBS {bbs}"),
            vec![
                Field::checkbox(&retrieve_id, &retrieve_id, "Retrieve practice messages", true),
                Field::checkbox(&send_id, &send_id, "Accept retrieved practice messages", send),
                Field::checkbox(&suppress_id, &suppress_id, "Simulated outage", suppress),
            ],
        ));
    }

    rows.push(
        FormRow::new(
            "Retrieval Schedule",
            vec![
                Field::text_area("retrievals", "Schedule", config.retrievals.clone()),
                Field::checkbox("dontKillMessages", "dontKillMessages", "Leave messages on BBS", false),
                Field::checkbox(
                    "dontSendResponses",
                    "dontSendResponses",
                    "Don't send delivery receipts",
                    false,
                ),
            ],
        )
        .with_help("Schedule for when to retrieve practice messages from BBSes."),
    );
    rows.push(FormRow::new(
        "Message to Send",
        vec![
            message_radio(MessageType::Any, "Any message of specified type(s)", selected),
            message_radio(MessageType::Plain, "Copy of provided plain text message", selected),
            message_radio(MessageType::Form, "Copy of provided form", selected),
        ],
    ));
    rows.push(
        FormRow::new(
            "Message Type(s)",
            config
                .message_types
                .iter()
                .map(|tag| {
                    let label = if tag == "plain" { "Plain text message" } else { tag.as_str() };
                    Field::checkbox(
                        &format!("mtype.{tag}"),
                        "mtype",
                        label,
                        config.accepted_types.contains(tag),
                    )
                })
                .collect(),
        )
        .with_id(MTYPE_ROW)
        .hidden(!shown.mtype_row)
        .with_help("Message type(s) that are accepted as practice messages."),
    );
    rows.push(
        FormRow::new(
            "Subject Line",
            vec![Field::text("plainSubject", "Subject", DEFAULT_PLAIN_SUBJECT)],
        )
        .with_id(PLAIN_SUBJECT_ROW)
        .hidden(!shown.plain_subject_row)
        .with_help(
            "Subject line of the expected plain text message, with message number (ignored), \
             handling order, and subject.",
        ),
    );
    rows.push(
        FormRow::new("Message Body", vec![Field::text_area("plainBody", "Body", "")])
            .with_id(PLAIN_BODY_ROW)
            .hidden(!shown.plain_body_row)
            .with_help("Body of the expected plain text message."),
    );
    rows.push(
        FormRow::new("Encoded Form", vec![Field::text_area("formBody", "Encoding", "")])
            .with_id(FORM_BODY_ROW)
            .hidden(!shown.form_body_row)
            .with_help("PackItForms encoding of the expected form."),
    );
    rows.push(
        FormRow::new("Form Image(s)", vec![Field::text("formImage", "Image files", "")])
            .with_id(FORM_IMAGE_ROW)
            .hidden(!shown.form_image_row)
            .with_help("Image(s) of the expected form, shown to operators as what to send."),
    );
    rows.push(
        FormRow::new(
            "Extra Instructions",
            vec![Field::text_area("instructions", "Instructions", "")],
        )
        .with_help("Additional instructions for practice message senders."),
    );

    FormDocument::new(rows)
}

fn message_radio(message_type: MessageType, label: &str, selected: MessageType) -> Field {
    Field::radio(
        message_type.selector_id(),
        MESSAGE_TYPE_NAME,
        message_type.as_str(),
        label,
        message_type == selected,
    )
}

fn seed_date(value: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    parse_relative_date_input(value?, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::document::FieldStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("date")
    }

    #[test]
    fn default_dates_span_session_days() {
        let config = FormConfig::default();
        let doc = session_editor(&config, today());
        assert_eq!(doc.value(START_DATE).as_deref(), Some("2024-01-01"));
        assert_eq!(doc.value(END_DATE).as_deref(), Some("2024-01-08"));
    }

    #[test]
    fn oversized_session_length_falls_back_to_start() {
        let config = FormConfig {
            session_days: 1_000_000_000,
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.value(START_DATE).as_deref(), Some("2024-01-01"));
        assert_eq!(doc.value(END_DATE).as_deref(), Some("2024-01-01"));

        let config = FormConfig {
            session_days: i64::MAX,
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.value(END_DATE).as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn configured_dates_win() {
        let config = FormConfig {
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("+2w".to_string()),
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.value(START_DATE).as_deref(), Some("2024-03-01"));
        assert_eq!(doc.value(END_DATE).as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn bbs_rows_seed_exclusive_pairs() {
        let config = FormConfig {
            bbses: vec!["W1XSC".to_string(), "W2XSC".to_string()],
            to_bbses: vec!["W1XSC".to_string()],
            down_bbses: vec!["W1XSC".to_string(), "W2XSC".to_string()],
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.checked("destbbs.W1XSC"), Some(true));
        assert_eq!(doc.checked("downbbs.W1XSC"), Some(false));
        assert_eq!(doc.checked("destbbs.W2XSC"), Some(false));
        assert_eq!(doc.checked("downbbs.W2XSC"), Some(true));
        assert_eq!(doc.checked("retrieve.W2XSC"), Some(true));
    }

    #[test]
    fn visibility_follows_preselected_type() {
        let config = FormConfig {
            message_type: MessageType::Plain,
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.selected_radio(MESSAGE_TYPE_NAME), Some("plainMessage"));
        assert_eq!(doc.is_group_visible(MTYPE_ROW), Some(false));
        assert_eq!(doc.is_group_visible(PLAIN_SUBJECT_ROW), Some(true));
        assert_eq!(doc.is_group_visible(PLAIN_BODY_ROW), Some(true));
        assert_eq!(doc.is_group_visible(FORM_BODY_ROW), Some(false));
        assert_eq!(doc.value("plainSubject").as_deref(), Some(DEFAULT_PLAIN_SUBJECT));
    }

    #[test]
    fn accepted_types_are_checked() {
        let config = FormConfig {
            message_types: vec!["plain".to_string(), "ICS213".to_string()],
            accepted_types: vec!["ICS213".to_string()],
            ..Default::default()
        };
        let doc = session_editor(&config, today());
        assert_eq!(doc.checked_values("mtype"), vec!["ICS213"]);
    }
}
