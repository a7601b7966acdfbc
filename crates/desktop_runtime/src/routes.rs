//! Route bridge between navigable paths and desktop windows.
//!
//! The table itself lives in `windows.manifest.toml` and is compiled in by the build script.
//! Navigation changes are fed to the reducer as [`crate::DesktopAction::NavigationChanged`], which
//! parks them until boot hydration finished and then opens the matching window.

use crate::{manifest::ROUTE_TABLE, model::WindowId, reducer::OpenWindowRequest};

/// One navigable path and the window presenting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub window_id: &'static str,
    pub component: &'static str,
    pub title: &'static str,
}

impl RouteEntry {
    pub fn open_request(&self) -> OpenWindowRequest {
        OpenWindowRequest::new(self.window_id, self.component, self.title)
    }
}

/// Returns the full static route table.
pub fn route_table() -> &'static [RouteEntry] {
    ROUTE_TABLE
}

/// Strips query string, fragment, and trailing slashes from a location path.
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Finds the entry whose path equals `path` or is a whole-segment prefix of it.
///
/// `/requests` matches `/requests` and `/requests/42`, never `/requestsx`. The longest matching
/// entry wins.
pub fn match_route(path: &str) -> Option<&'static RouteEntry> {
    let path = normalize_path(path);
    ROUTE_TABLE
        .iter()
        .filter(|entry| {
            path == entry.path
                || path
                    .strip_prefix(entry.path)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|entry| entry.path.len())
}

/// Returns the route presenting `window_id`, if any.
pub fn route_for_window(window_id: &WindowId) -> Option<&'static RouteEntry> {
    ROUTE_TABLE
        .iter()
        .find(|entry| entry.window_id == window_id.as_str())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn exact_path_matches() {
        let entry = match_route("/requests").expect("route");
        assert_eq!(entry.window_id, "requests");
        assert_eq!(entry.component, "Requests");
    }

    #[test]
    fn sub_path_matches_parent_entry() {
        assert_eq!(
            match_route("/requests/42/edit").map(|e| e.window_id),
            Some("requests")
        );
    }

    #[test]
    fn partial_segment_does_not_match() {
        assert_eq!(match_route("/requestsx"), None);
        assert_eq!(match_route("/"), None);
        assert_eq!(match_route("/unknown/path"), None);
    }

    #[test]
    fn query_fragment_and_trailing_slash_are_ignored() {
        assert_eq!(
            match_route("/browse/?q=lamp#top").map(|e| e.window_id),
            Some("browse")
        );
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn window_lookup_finds_route_path() {
        assert_eq!(
            route_for_window(&WindowId::from("profile")).map(|e| e.path),
            Some("/profile")
        );
        assert_eq!(route_for_window(&WindowId::from("scratch")), None);
    }

    #[test]
    fn open_request_carries_route_identity_without_navigation() {
        let request = match_route("/messages").expect("route").open_request();
        assert_eq!(request.window_id, WindowId::from("messages"));
        assert_eq!(request.title, "Messages");
        assert!(!request.update_navigation);
    }
}
