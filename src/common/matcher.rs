//! Pure text classification for sync completion signals.
//!
//! The watched plugin reports sync progress as plain chat lines; there is no
//! structured completion event, so classification is a substring heuristic
//! over the lines it prints.

/// Prefix the watched plugin puts on every line it emits.
const SENTINEL_PREFIX: &str = "wom:";

/// True iff the line looks like a completed group sync.
///
/// Example completion line:
/// "WOM: Synced 494 clan members. 0 added, 0 removed, 0 ranks changed."
pub fn is_success_signal(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.starts_with(SENTINEL_PREFIX)
        && lower.contains("synced")
        && lower.contains("clan members")
}

/// True iff the line looks like a failed group sync.
pub fn is_failure_signal(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.starts_with(SENTINEL_PREFIX)
        && (lower.contains("failed") || lower.contains("error"))
}

/// Whether a menu option label should open a detection window.
///
/// Containment, not equality: host builds decorate menu labels with color
/// tags or prefixes. Case-sensitive on the configured phrase.
pub fn is_sync_trigger(label: &str, phrase: &str) -> bool {
    label.contains(phrase)
}

/// Strip `<...>` decoration tags the host embeds in chat lines.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    mod success_signals {
        use super::*;

        #[test]
        fn test_real_completion_line() {
            assert!(is_success_signal(
                "WOM: Synced 494 clan members. 0 added, 0 removed."
            ));
        }

        #[test]
        fn test_started_line_is_not_success() {
            assert!(!is_success_signal("WOM: Sync started."));
        }

        #[test]
        fn test_missing_sentinel_prefix() {
            assert!(!is_success_signal("Synced 494 clan members."));
            assert!(!is_success_signal("Welcome! Synced clan members today."));
        }

        #[test]
        fn test_case_and_whitespace_normalized() {
            assert!(is_success_signal("  wom: SYNCED 3 CLAN MEMBERS.  "));
        }

        #[test]
        fn test_keyword_order_irrelevant() {
            assert!(is_success_signal("WOM: clan members synced."));
        }
    }

    mod failure_signals {
        use super::*;

        #[test]
        fn test_failed_keyword() {
            assert!(is_failure_signal("wom: sync failed: timeout"));
        }

        #[test]
        fn test_error_keyword() {
            assert!(is_failure_signal("WOM: Error while syncing group."));
        }

        #[test]
        fn test_missing_sentinel_prefix() {
            assert!(!is_failure_signal("sync failed: timeout"));
        }

        #[test]
        fn test_unrelated_line() {
            assert!(!is_failure_signal("WOM: Sync started."));
        }
    }

    mod triggers {
        use super::*;

        #[test]
        fn test_exact_label() {
            assert!(is_sync_trigger("Sync WOM Group", "Sync WOM Group"));
        }

        #[test]
        fn test_decorated_label() {
            assert!(is_sync_trigger(
                "<col=ff9040>Sync WOM Group</col>",
                "Sync WOM Group"
            ));
        }

        #[test]
        fn test_case_sensitive() {
            assert!(!is_sync_trigger("sync wom group", "Sync WOM Group"));
        }

        #[test]
        fn test_unrelated_label() {
            assert!(!is_sync_trigger("Open Settings", "Sync WOM Group"));
        }
    }

    mod tag_stripping {
        use super::*;

        #[test]
        fn test_plain_text_unchanged() {
            assert_eq!(strip_tags("WOM: Sync started."), "WOM: Sync started.");
        }

        #[test]
        fn test_color_tags_removed() {
            assert_eq!(
                strip_tags("<col=ff0000>WOM:</col> Synced 10 clan members."),
                "WOM: Synced 10 clan members."
            );
        }

        #[test]
        fn test_unclosed_tag_swallows_rest() {
            assert_eq!(strip_tags("before<col=ff0000"), "before");
        }
    }
}
