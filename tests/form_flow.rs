use member_form::{
    domain::MemberRecord,
    form::{edit_record, render::SUBMIT_LABEL, FormResult, ScriptedSurface},
};

fn completed(result: FormResult<MemberRecord>) -> MemberRecord {
    match result {
        FormResult::Completed(record) => record,
        FormResult::Cancelled => panic!("form was cancelled"),
    }
}

/// Moves from the last name field to the submit control and submits.
const SUBMIT_FROM_LAST_NAME: &str = "DOWN|DOWN|DOWN|DOWN|DOWN|DOWN|ENTER";
/// Moves from the first name field to the submit control and submits.
const SUBMIT_FROM_FIRST_NAME: &str = "DOWN|DOWN|DOWN|DOWN|DOWN|DOWN|DOWN|ENTER";

#[test]
fn undo_reaches_back_into_an_earlier_edit_session() {
    let script = format!("ENTER|Ann,ENTER|ENTER|DOWN|Bo,ENTER|DOWN|ENTER|Lee,ENTER|{SUBMIT_FROM_LAST_NAME}");
    let mut surface = ScriptedSurface::from_script(80, 25, &script);
    let record = completed(edit_record(&mut surface, &MemberRecord::blank()).unwrap());
    assert_eq!(record.first_name, "Bo");
    assert_eq!(record.last_name, "Lee");
}

#[test]
fn redo_replays_an_undone_edit() {
    let script = format!("ENTER|Ann,ENTER|ENTER|DOWN|UP|ENTER|DOWN|ENTER|Lee,ENTER|{SUBMIT_FROM_LAST_NAME}");
    let mut surface = ScriptedSurface::from_script(80, 25, &script);
    let record = completed(edit_record(&mut surface, &MemberRecord::blank()).unwrap());
    assert_eq!(record.first_name, "Ann");
}

#[test]
fn typing_past_the_line_width_is_rejected_with_an_alert() {
    let script = format!("ENTER|Christopher|ab|X,ENTER|DOWN|ENTER|Lee,ENTER|{SUBMIT_FROM_LAST_NAME}");
    let mut surface = ScriptedSurface::from_script(12, 25, &script);
    let record = completed(edit_record(&mut surface, &MemberRecord::blank()).unwrap());
    assert_eq!(record.first_name, "ChristopherX");
    assert_eq!(surface.alerts(), 1);
}

#[test]
fn invalid_email_is_retried_until_accepted() {
    let mut original = MemberRecord::new("Jane", "Doe");
    original.email = Some("old@example.com".into());
    let script = format!(
        "DOWN|DOWN|DOWN|DOWN|DOWN|ENTER|{}not-an-email,ENTER|{}jane@new.org,ENTER|DOWN|DOWN|ENTER",
        "BS,".repeat("old@example.com".len()),
        "BS,".repeat("not-an-email".len()),
    );
    let mut surface = ScriptedSurface::from_script(80, 25, &script);
    let record = completed(edit_record(&mut surface, &original).unwrap());
    assert_eq!(record.email.as_deref(), Some("jane@new.org"));
    assert_eq!(surface.alerts(), 1);
    // The message shares the submit row on a 25-row screen; clearing it restores the control.
    assert_eq!(surface.row_text(23), SUBMIT_LABEL);
}

#[test]
fn keys_typed_ahead_of_a_commit_drive_navigation() {
    let script = "ENTER|Ann,ENTER,DOWN,ENTER,Lee,ENTER,DOWN,DOWN,DOWN,DOWN,DOWN,DOWN,ENTER";
    let mut surface = ScriptedSurface::from_script(80, 25, script);
    let record = completed(edit_record(&mut surface, &MemberRecord::blank()).unwrap());
    assert_eq!(record.full_name(), "Ann Lee");
    assert_eq!(surface.remaining_keys(), 0);
}

#[test]
fn submit_is_refused_until_both_names_are_present() {
    let script = "DOWN|DOWN|DOWN|DOWN|DOWN|DOWN|DOWN|ENTER|ESC";
    let mut surface = ScriptedSurface::from_script(80, 25, script);
    let result = edit_record(&mut surface, &MemberRecord::blank()).unwrap();
    assert_eq!(result, FormResult::Cancelled);
    assert_eq!(surface.alerts(), 1);
}

#[test]
fn missing_first_name_blocks_submit_until_filled_in() {
    let script = format!(
        "{SUBMIT_FROM_FIRST_NAME}|UP|UP|UP|UP|UP|UP|UP|ENTER|Jane,ENTER|{SUBMIT_FROM_FIRST_NAME}"
    );
    let mut surface = ScriptedSurface::from_script(80, 25, &script);
    let record = completed(edit_record(&mut surface, &MemberRecord::new("", "Doe")).unwrap());
    assert_eq!(surface.alerts(), 1);
    assert_eq!(record.first_name, "Jane");
    assert_eq!(record.last_name, "Doe");
    assert_eq!(surface.remaining_keys(), 0);
}

#[test]
fn insertions_and_deletions_shift_the_rendered_line() {
    let original = MemberRecord::new("Jne", "Doe");
    let script = format!("ENTER|LEFT,LEFT,a|END,BS|e,ENTER|{SUBMIT_FROM_FIRST_NAME}");
    let mut surface = ScriptedSurface::from_script(80, 25, &script);
    let record = completed(edit_record(&mut surface, &original).unwrap());
    assert_eq!(record.first_name, "Jane");
    assert_eq!(surface.row_text(3), "Jane");
    assert!(surface.region_moves() >= 1);
}
