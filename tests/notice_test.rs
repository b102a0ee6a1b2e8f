use init_dev_branch::notice::Notice;

// ============================================================================
// Notice Display Tests
// ============================================================================

#[test]
fn test_notice_stale_directory_absent_display() {
    let notice = Notice::StaleDirectoryAbsent {
        path: "production".to_string(),
    };

    let display_msg = notice.to_string();
    assert!(
        display_msg.contains("'production' not found"),
        "Message should name the directory, got: {}",
        display_msg
    );
    assert!(!notice.is_warning());
}

#[test]
fn test_notice_marker_not_found_display() {
    let notice = Notice::MarkerNotFound {
        file: ".github/workflows/kibot.yml".to_string(),
    };

    let display_msg = notice.to_string();
    assert!(
        display_msg.contains("no changes made"),
        "Message should say nothing changed, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains(".github/workflows/kibot.yml"),
        "Message should name the workflow file, got: {}",
        display_msg
    );
    assert!(!notice.is_warning());
}

#[test]
fn test_notice_template_missing_is_warning() {
    let notice = Notice::SignOffTemplateMissing {
        path: ".gitmessage".to_string(),
    };

    let display_msg = notice.to_string();
    assert!(
        display_msg.contains("placeholder signer"),
        "Message should mention the placeholder, got: {}",
        display_msg
    );
    assert!(notice.is_warning());
}

#[test]
fn test_notice_line_missing_is_warning() {
    let notice = Notice::SignOffLineMissing {
        path: ".gitmessage".to_string(),
    };

    let display_msg = notice.to_string();
    assert!(
        display_msg.contains("Signed-off-by:"),
        "Message should name the missing line, got: {}",
        display_msg
    );
    assert!(notice.is_warning());
}
