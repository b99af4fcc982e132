use appointment_engine::model::{AppointmentDraft, AppointmentId, ContactId, CustomerId, UserId};
use appointment_engine::ScheduleError;
use chrono::NaiveDate;

fn draft() -> AppointmentDraft {
    let start = NaiveDate::from_ymd_opt(2026, 5, 4)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    AppointmentDraft {
        customer_id: CustomerId(1),
        contact_id: ContactId(3),
        contact_name: " Li Lee ".to_string(),
        user_id: UserId(1),
        title: "  Onboarding".to_string(),
        description: "Walkthrough ".to_string(),
        appointment_type: "Training".to_string(),
        location: "Remote".to_string(),
        start,
        end: start + chrono::Duration::hours(1),
    }
}

#[test]
fn normalized_trims_text_fields() {
    let normalized = draft().normalized().unwrap();

    assert_eq!(normalized.contact_name, "Li Lee");
    assert_eq!(normalized.title, "Onboarding");
    assert_eq!(normalized.description, "Walkthrough");
}

#[test]
fn blank_field_is_named_in_error() {
    let mut blank = draft();
    blank.location = "\t ".to_string();

    let err = blank.normalized().unwrap_err();

    assert!(matches!(err, ScheduleError::MissingField("location")));
    assert_eq!(err.to_string(), "Missing required field: location");
}

#[test]
fn with_id_and_into_draft_preserve_fields() {
    let original = draft();
    let appointment = original.clone().with_id(AppointmentId(12));

    assert_eq!(appointment.id, AppointmentId(12));
    assert_eq!(appointment.into_draft(), original);
}

#[test]
fn appointment_type_serializes_as_type() {
    let appointment = draft().with_id(AppointmentId(1));

    let json = serde_json::to_value(&appointment).unwrap();

    assert_eq!(json["type"], "Training");
    assert_eq!(json["id"], 1);
    assert_eq!(json["start"], "2026-05-04T09:00:00");
}

#[test]
fn appointment_display_line() {
    let appointment = draft().with_id(AppointmentId(4));
    assert_eq!(
        appointment.to_string(),
        "Appt ID: 4 Customer: 1 Type: Training Start: 2026-05-04 09:00:00 End: 2026-05-04 10:00:00"
    );
}
