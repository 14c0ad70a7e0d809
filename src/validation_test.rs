use super::*;

// =============================================================
// Helpers
// =============================================================

fn field(kind: FieldKind, value: &str) -> FieldInput {
    FieldInput { required: false, kind, value: value.to_owned(), is_confirm: false }
}

fn required(kind: FieldKind, value: &str) -> FieldInput {
    FieldInput { required: true, ..field(kind, value) }
}

fn confirm(value: &str) -> FieldInput {
    FieldInput { is_confirm: true, ..field(FieldKind::Password, value) }
}

// =============================================================
// FieldKind
// =============================================================

#[test]
fn control_types_map_to_kinds() {
    assert_eq!(FieldKind::from_control_type("text"), FieldKind::Text);
    assert_eq!(FieldKind::from_control_type(""), FieldKind::Text);
    assert_eq!(FieldKind::from_control_type("EMAIL"), FieldKind::Email);
    assert_eq!(FieldKind::from_control_type("password"), FieldKind::Password);
    assert_eq!(FieldKind::from_control_type("textarea"), FieldKind::Other);
    assert_eq!(FieldKind::from_control_type("select-one"), FieldKind::Other);
}

// =============================================================
// Email pattern
// =============================================================

#[test]
fn minimal_address_passes() {
    assert!(is_valid_email("a@b.c"));
    assert!(is_valid_email("First.Last@Example.COM"));
}

#[test]
fn malformed_addresses_fail() {
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a@.c"));
    assert!(!is_valid_email("ab.c"));
    assert!(!is_valid_email("a b@c.d"));
    assert!(!is_valid_email("a@@b.c"));
    assert!(!is_valid_email(""));
}

// =============================================================
// Rule precedence
// =============================================================

#[test]
fn required_blank_field_errors() {
    assert_eq!(validate_field(&required(FieldKind::Text, ""), None), Err(ValidationError::Required));
    assert_eq!(validate_field(&required(FieldKind::Text, "  \t\n"), None), Err(ValidationError::Required));
}

#[test]
fn required_wins_over_password_length() {
    let f = required(FieldKind::Password, " ");
    assert_eq!(validate_field(&f, None), Err(ValidationError::Required));
}

#[test]
fn optional_empty_email_is_accepted() {
    assert_eq!(validate_field(&field(FieldKind::Email, ""), None), Ok(()));
}

#[test]
fn invalid_email_errors() {
    assert_eq!(validate_field(&field(FieldKind::Email, "ab.c"), None), Err(ValidationError::InvalidEmail));
}

#[test]
fn whitespace_only_optional_email_fails_pattern() {
    assert_eq!(validate_field(&field(FieldKind::Email, "  "), None), Err(ValidationError::InvalidEmail));
}

#[test]
fn short_password_errors_and_eight_chars_passes() {
    assert_eq!(validate_field(&field(FieldKind::Password, "1234567"), None), Err(ValidationError::PasswordTooShort));
    assert_eq!(validate_field(&field(FieldKind::Password, "12345678"), None), Ok(()));
    assert_eq!(validate_field(&field(FieldKind::Password, "a much longer pass"), None), Ok(()));
}

#[test]
fn optional_empty_password_still_fails_length() {
    assert_eq!(validate_field(&field(FieldKind::Password, ""), None), Err(ValidationError::PasswordTooShort));
}

#[test]
fn password_length_counts_utf16_units() {
    assert_eq!(validate_field(&field(FieldKind::Password, "ééééééé"), None), Err(ValidationError::PasswordTooShort));
    assert_eq!(validate_field(&field(FieldKind::Password, "éééééééé"), None), Ok(()));
    // Each supplementary-plane character is a surrogate pair.
    assert_eq!(validate_field(&field(FieldKind::Password, "😀😀😀"), None), Err(ValidationError::PasswordTooShort));
    assert_eq!(validate_field(&field(FieldKind::Password, "😀😀😀😀"), None), Ok(()));
}

#[test]
fn confirm_mismatch_errors() {
    assert_eq!(validate_field(&confirm("password2"), Some("password1")), Err(ValidationError::PasswordMismatch));
}

#[test]
fn confirm_without_primary_password_is_accepted() {
    let f = FieldInput { is_confirm: true, ..field(FieldKind::Text, "anything") };
    assert_eq!(validate_field(&f, None), Ok(()));
}

#[test]
fn equal_confirm_never_errors_regardless_of_length() {
    let f = FieldInput { is_confirm: true, ..field(FieldKind::Text, "abc") };
    assert_eq!(validate_field(&f, Some("abc")), Ok(()));
}

#[test]
fn short_confirm_reports_length_before_mismatch() {
    assert_eq!(validate_field(&confirm("short"), Some("longenough")), Err(ValidationError::PasswordTooShort));
}

#[test]
fn messages_match_page_copy() {
    assert_eq!(ValidationError::Required.to_string(), "This field is required");
    assert_eq!(ValidationError::InvalidEmail.to_string(), "Please enter a valid email address");
    assert_eq!(ValidationError::PasswordTooShort.to_string(), "Password must be at least 8 characters");
    assert_eq!(ValidationError::PasswordMismatch.to_string(), "Passwords do not match");
}

// =============================================================
// Whole form
// =============================================================

#[test]
fn empty_form_is_vacuously_valid() {
    assert!(validate_form(&[]).is_valid());
}

#[test]
fn form_report_lists_each_failing_field_once() {
    let fields = vec![
        required(FieldKind::Text, ""),
        required(FieldKind::Email, "not-an-email"),
        field(FieldKind::Text, "fine"),
    ];
    let report = validate_form(&fields);
    assert!(!report.is_valid());
    assert_eq!(report.errors, vec![(0, ValidationError::Required), (1, ValidationError::InvalidEmail)]);
}

#[test]
fn confirm_compares_against_first_password_field() {
    let fields = vec![field(FieldKind::Password, "correct horse"), confirm("correct horse")];
    assert!(validate_form(&fields).is_valid());

    let fields = vec![field(FieldKind::Password, "correct horse"), confirm("battery staple")];
    assert_eq!(validate_form(&fields).errors, vec![(1, ValidationError::PasswordMismatch)]);
}

#[test]
fn confirm_as_only_password_field_matches_itself() {
    let fields = vec![confirm("longenough")];
    assert!(validate_form(&fields).is_valid());
}
