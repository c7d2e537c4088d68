//! Page routing.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Landing page with the stock cards.
    Home,
    /// Donor registration form.
    Donate,
    /// Blood request form.
    Request,
    /// Inventory table.
    Inventory,
    /// Fallback for any unknown path.
    NotFound,
}

impl Page {
    /// Pages reachable from navigation, in menu order.
    pub const NAVIGABLE: [Page; 4] = [Self::Home, Self::Donate, Self::Request, Self::Inventory];

    /// Map a request path to its page. Unknown paths resolve to
    /// [`Page::NotFound`] and are logged.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let page = match trimmed {
            "" => Self::Home,
            "/donate" => Self::Donate,
            "/request" => Self::Request,
            "/inventory" => Self::Inventory,
            _ => Self::NotFound,
        };
        if page == Self::NotFound {
            warn!(path, "User attempted to access non-existent route");
        }
        page
    }

    /// Canonical path. `NotFound` has none of its own.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::Donate => Some("/donate"),
            Self::Request => Some("/request"),
            Self::Inventory => Some("/inventory"),
            Self::NotFound => None,
        }
    }

    /// Page heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Give Blood, Save Lives",
            Self::Donate => "Register as a Blood Donor",
            Self::Request => "Request Blood",
            Self::Inventory => "Blood Inventory",
            Self::NotFound => "Page not found",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    #[test]
    fn test_resolve_known_paths() {
        assert_eq!(Page::resolve("/"), Page::Home);
        assert_eq!(Page::resolve(""), Page::Home);
        assert_eq!(Page::resolve("/donate"), Page::Donate);
        assert_eq!(Page::resolve("/request/"), Page::Request);
        assert_eq!(Page::resolve("/inventory"), Page::Inventory);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        init_test_logging();
        assert_eq!(Page::resolve("/admin"), Page::NotFound);
        assert_eq!(Page::resolve("/donate/extra"), Page::NotFound);
        assert_eq!(Page::resolve("/Donate"), Page::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for page in Page::NAVIGABLE {
            let path = page.path().unwrap();
            assert_eq!(Page::resolve(path), page);
        }
        assert_eq!(Page::NotFound.path(), None);
    }

    #[test]
    fn test_titles() {
        assert_eq!(Page::Inventory.title(), "Blood Inventory");
        assert_eq!(Page::NotFound.to_string(), "Page not found");
    }
}
