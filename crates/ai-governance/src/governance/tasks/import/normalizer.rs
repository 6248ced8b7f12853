pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Tracker status columns use free text; these spellings mean done.
pub(crate) fn is_completed_status(value: &str) -> bool {
    matches!(
        normalize_name(value).as_str(),
        "completed" | "complete" | "done" | "closed" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_lose_whitespace_and_case() {
        assert_eq!(
            normalize_name("\u{feff}Publish  the   Transparency Notice "),
            "publish the transparency notice"
        );
    }

    #[test]
    fn completion_spellings() {
        assert!(is_completed_status(" Done "));
        assert!(is_completed_status("COMPLETED"));
        assert!(!is_completed_status("In progress"));
        assert!(!is_completed_status(""));
    }
}
