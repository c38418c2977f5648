//! Role-derived navigation and page access

use cineapp_auth::{Capabilities, Identity, Session};

/// Who is looking at the page, resolved once per request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewer {
    pub identity: Option<Identity>,
    pub capabilities: Capabilities,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                identity: Some(session.identity.clone()),
                capabilities: session.capabilities,
            },
            None => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Signed in and holding ADMIN or CLIENTE
    pub fn can_use_personal_list(&self) -> bool {
        self.is_authenticated() && self.capabilities.any()
    }

    /// Signed in and holding ADMIN
    pub fn can_edit_catalog(&self) -> bool {
        self.is_authenticated() && self.capabilities.admin
    }
}

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    PersonalList,
    Admin,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::PersonalList => "/cliente",
            Self::Admin => "/admin",
            Self::Profile => "/perfil",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Home),
            "/cliente" => Some(Self::PersonalList),
            "/admin" => Some(Self::Admin),
            "/perfil" => Some(Self::Profile),
            _ => None,
        }
    }

    /// Whether `viewer` may open this page.
    ///
    /// The profile page is open to everyone; it renders a sign-in notice
    /// for anonymous viewers.
    pub fn access(&self, viewer: &Viewer) -> bool {
        match self {
            Self::Home | Self::Profile => true,
            Self::PersonalList => viewer.can_use_personal_list(),
            Self::Admin => viewer.can_edit_catalog(),
        }
    }
}

/// A link in the header navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

impl NavLink {
    pub fn href(&self) -> &'static str {
        self.route.path()
    }
}

/// Buttons on the right of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    /// Starts the login flow
    Register,
    Logout,
    Profile,
}

impl HeaderButton {
    pub fn href(&self) -> &'static str {
        match self {
            Self::Register => "/auth/login",
            Self::Logout => "/auth/logout",
            Self::Profile => Route::Profile.path(),
        }
    }
}

/// The composed header for one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub links: Vec<NavLink>,
    pub buttons: Vec<HeaderButton>,
}

impl Header {
    pub fn compose(viewer: &Viewer) -> Self {
        let mut links = vec![NavLink {
            label: "Inicio",
            route: Route::Home,
        }];

        if viewer.can_use_personal_list() {
            links.push(NavLink {
                label: "Mi Lista",
                route: Route::PersonalList,
            });
        }

        if viewer.can_edit_catalog() {
            links.push(NavLink {
                label: "Editar Películas",
                route: Route::Admin,
            });
        }

        let buttons = if viewer.is_authenticated() {
            vec![HeaderButton::Logout, HeaderButton::Profile]
        } else {
            vec![HeaderButton::Register]
        };

        Self { links, buttons }
    }

    pub fn shows(&self, route: Route) -> bool {
        self.links.iter().any(|l| l.route == route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineapp_auth::{Role, DEFAULT_ROLES_CLAIM};

    fn viewer_with(roles: &[Role]) -> Viewer {
        let identity = Identity::new("auth0|v").with_roles(DEFAULT_ROLES_CLAIM, roles);
        Viewer {
            capabilities: identity.capabilities(DEFAULT_ROLES_CLAIM),
            identity: Some(identity),
        }
    }

    #[test]
    fn test_link_visibility_for_every_role_set() {
        let cases: [(&[Role], bool, bool); 4] = [
            (&[], false, false),
            (&[Role::Client], true, false),
            (&[Role::Admin], true, true),
            (&[Role::Admin, Role::Client], true, true),
        ];

        for (roles, list, admin) in cases {
            let header = Header::compose(&viewer_with(roles));
            assert_eq!(header.shows(Route::PersonalList), list, "roles {:?}", roles);
            assert_eq!(header.shows(Route::Admin), admin, "roles {:?}", roles);
            assert!(header.shows(Route::Home));
        }
    }

    #[test]
    fn test_capabilities_without_identity_show_nothing() {
        let viewer = Viewer {
            identity: None,
            capabilities: Capabilities {
                admin: true,
                client: true,
            },
        };
        let header = Header::compose(&viewer);
        assert_eq!(header.links.len(), 1);
        assert_eq!(header.buttons, vec![HeaderButton::Register]);
    }

    #[test]
    fn test_admin_is_not_implicitly_client() {
        let viewer = viewer_with(&[Role::Admin]);
        assert!(viewer.capabilities.admin);
        assert!(!viewer.capabilities.client);
    }

    #[test]
    fn test_buttons_for_signed_in_viewer() {
        let header = Header::compose(&viewer_with(&[]));
        assert_eq!(header.buttons, vec![HeaderButton::Logout, HeaderButton::Profile]);
        assert_eq!(header.links[0].href(), "/");
    }

    #[test]
    fn test_route_access() {
        let anonymous = Viewer::anonymous();
        let client = viewer_with(&[Role::Client]);
        let admin = viewer_with(&[Role::Admin]);

        assert!(Route::Home.access(&anonymous));
        assert!(!Route::PersonalList.access(&anonymous));
        assert!(Route::PersonalList.access(&client));
        assert!(!Route::Admin.access(&client));
        assert!(Route::Admin.access(&admin));
        assert_eq!(Route::from_path("/admin/"), Some(Route::Admin));
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/otra"), None);
    }
}
