/// Authentication state of the current user.
///
/// Passed explicitly to anything whose behaviour depends on whether the user
/// is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        /// ID token issued by the identity provider.
        token: String,
    },
}

impl Session {
    /// Builds a session from an optional token; blank tokens are anonymous.
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::Authenticated { token },
            _ => Self::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { token } => Some(token),
        }
    }
}
