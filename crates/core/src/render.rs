//! HTML rendering for notices.
//!
//! Builds the alert markup the LMS theme styles. Content passed in here
//! is server-authored and treated as trusted HTML, the same contract the
//! admin-facing message fields have always had.

use crate::notice::Level;

/// The dismiss button shown on dismissible notices.
#[must_use]
pub fn dismiss_button(notice_id: &str) -> String {
    format!(
        "<button type=\"button\" class=\"close cnid-dismiss\" data-dismiss=\"alert\" \
         data-id=\"{notice_id}\" aria-label=\"Close\">\
         <i class=\"fa fa-times\" aria-hidden=\"true\"></i></button>"
    )
}

/// The chevron link that expands a collapsed item list.
#[must_use]
pub fn expand_toggle(notice_id: &str) -> String {
    format!(
        "<a href=\"#notification{notice_id}\" class=\"alert-link alert-dropdown collapsed close\" \
         data-toggle=\"collapse\" aria-expanded=\"false\" aria-controls=\"notification{notice_id}\">\
         <i class=\"fa fa-chevron-down\" aria-hidden=\"true\"></i></a>"
    )
}

/// A styled in-alert link.
#[must_use]
pub fn alert_link(href: &str, text: &str) -> String {
    format!("<a href=\"{href}\" class=\"alert-link\">{text}</a>")
}

/// An unordered list of rendered items.
#[must_use]
pub fn item_list(items: &[String]) -> String {
    let mut out = String::from("<ul class=\"list\">");
    for item in items {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// The collapse container the expand toggle targets.
///
/// `expanded` restores the user's last toggle state so the list opens
/// the way they left it.
#[must_use]
pub fn collapse_container(notice_id: &str, inner: &str, expanded: bool) -> String {
    let state = if expanded { "collapse show" } else { "collapse" };
    format!(
        "<div class=\"{state} alert-dropdown-container\" id=\"notification{notice_id}\">{inner}</div>"
    )
}

/// The full alert container around resolved contents.
///
/// `actions_html` holds any dismiss/expand controls; `message` is the
/// variant's resolved content and must be non-empty (empty content is
/// suppressed before this point).
#[must_use]
pub fn alert(level: Level, dismissible: bool, actions_html: &str, message: &str) -> String {
    let mut classes = String::from("alert");
    let level_class = level.css_class();
    if !level_class.is_empty() {
        classes.push(' ');
        classes.push_str(level_class);
    }
    if dismissible {
        classes.push_str(" alert-dismissible");
    }
    classes.push_str(" alert-icon");

    let icon = level.icon();

    format!(
        "<div class=\"{classes}\" role=\"alert\">\
         <div class=\"action-icons\">{actions_html}</div>\
         <i class=\"fa {icon}\"></i> {message}</div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_warning_with_dismiss() {
        let html = alert(
            Level::Warning,
            true,
            &dismiss_button("n1"),
            "Course ending soon",
        );

        assert!(html.contains("alert-warning"));
        assert!(html.contains("alert-dismissible"));
        assert!(html.contains("fa-exclamation-triangle"));
        assert!(html.contains("cnid-dismiss"));
        assert!(html.contains("data-id=\"n1\""));
        assert!(html.contains("Course ending soon"));
    }

    #[test]
    fn test_alert_non_dismissible_has_no_button_class() {
        let html = alert(Level::Info, false, "", "hello");

        assert!(html.contains("alert-info"));
        assert!(!html.contains("alert-dismissible"));
        assert!(html.contains("fa-info-circle"));
    }

    #[test]
    fn test_unknown_level_falls_back_to_question_icon() {
        let html = alert(Level::Unknown, false, "", "hello");

        assert!(html.contains("fa-question"));
        assert!(!html.contains("alert-unknown"));
    }

    #[test]
    fn test_item_list_wraps_each_item() {
        let html = item_list(&["one".to_string(), "two".to_string()]);
        assert_eq!(html, "<ul class=\"list\"><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_collapse_container_targets_notice() {
        let html = collapse_container("n9", "<ul></ul>", false);
        assert!(html.contains("id=\"notificationn9\""));
        assert!(html.contains("\"collapse alert-dropdown-container\""));
    }

    #[test]
    fn test_collapse_container_restores_expanded_state() {
        let html = collapse_container("n9", "<ul></ul>", true);
        assert!(html.contains("\"collapse show alert-dropdown-container\""));
    }

    #[test]
    fn test_expand_toggle_points_at_container() {
        let html = expand_toggle("n9");
        assert!(html.contains("href=\"#notificationn9\""));
        assert!(html.contains("fa-chevron-down"));
    }
}
