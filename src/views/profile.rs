//! Profile page

use crate::views::Viewer;

pub const NOT_AVAILABLE: &str = "No disponible";
pub const SIGN_IN_NOTICE: &str = "Presiona Log In para ver información de tu perfil.";
pub const SIGN_IN_REQUIRED: &str = "Necesitas iniciar sesión para acceder a esta página";

/// Fields of the profile card, flattened for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub display_name: String,
    pub initial: char,
    pub picture: Option<String>,
    pub nickname: String,
    pub name: String,
    pub email: String,
    pub sub: String,
    pub email_verified: &'static str,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileView {
    SignedIn(ProfileDetails),
    /// Nothing to show; the UI renders the sign-in notice
    Anonymous {
        notice: &'static str,
        hint: &'static str,
    },
}

impl ProfileView {
    pub fn from_viewer(viewer: &Viewer) -> Self {
        let Some(user) = viewer.identity.as_ref() else {
            return Self::Anonymous {
                notice: SIGN_IN_NOTICE,
                hint: SIGN_IN_REQUIRED,
            };
        };

        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        let name = non_empty(&user.name);
        let nickname = non_empty(&user.nickname);

        let initial = name
            .iter()
            .chain(nickname.iter())
            .find_map(|s| s.chars().next())
            .unwrap_or('U');

        Self::SignedIn(ProfileDetails {
            display_name: nickname.clone().or_else(|| name.clone()).unwrap_or_default(),
            initial,
            picture: non_empty(&user.picture),
            nickname: nickname.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            name: name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: non_empty(&user.email).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sub: user.sub.clone(),
            email_verified: if user.email_verified { "Sí" } else { "No" },
            provider: user.provider().to_string(),
        })
    }

    pub fn details(&self) -> Option<&ProfileDetails> {
        match self {
            Self::SignedIn(details) => Some(details),
            Self::Anonymous { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineapp_auth::Identity;

    fn viewer(identity: Identity) -> Viewer {
        Viewer {
            identity: Some(identity),
            ..Viewer::default()
        }
    }

    #[test]
    fn test_anonymous_gets_notice() {
        let view = ProfileView::from_viewer(&Viewer::anonymous());
        assert!(view.details().is_none());
        assert_eq!(
            view,
            ProfileView::Anonymous {
                notice: SIGN_IN_NOTICE,
                hint: SIGN_IN_REQUIRED
            }
        );
    }

    #[test]
    fn test_nickname_preferred_for_display() {
        let identity = Identity::new("google-oauth2|42")
            .with_name("Ana Pérez")
            .with_nickname("ana")
            .with_email("ana@example.com");
        let view = ProfileView::from_viewer(&viewer(identity));
        let details = view.details().unwrap();

        assert_eq!(details.display_name, "ana");
        assert_eq!(details.initial, 'A');
        assert_eq!(details.provider, "google-oauth2");
        assert_eq!(details.email_verified, "No");
    }

    #[test]
    fn test_fallbacks_for_bare_identity() {
        let mut identity = Identity::new("abc");
        identity.email_verified = true;
        let view = ProfileView::from_viewer(&viewer(identity));
        let details = view.details().unwrap();

        assert_eq!(details.initial, 'U');
        assert_eq!(details.display_name, "");
        assert_eq!(details.email, NOT_AVAILABLE);
        assert_eq!(details.provider, "abc");
        assert_eq!(details.email_verified, "Sí");
    }

    #[test]
    fn test_initial_falls_back_to_nickname() {
        let identity = Identity::new("auth0|1").with_nickname("zeta");
        let details = ProfileView::from_viewer(&viewer(identity)).details().cloned().unwrap();
        assert_eq!(details.initial, 'z');
        assert_eq!(details.name, NOT_AVAILABLE);
    }
}
