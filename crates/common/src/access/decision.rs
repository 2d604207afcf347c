use super::classify::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Who is asking, as far as gating is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requester {
    /// Holds the read-private capability (editors, administrators)
    elevated: bool,
    /// The passphrase the requester presented, if any
    supplied_password: Option<String>,
}

impl Requester {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn elevated() -> Self {
        Self {
            elevated: true,
            supplied_password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.supplied_password = Some(password.into());
        self
    }

    pub fn has_elevated_capability(&self) -> bool {
        self.elevated
    }

    pub fn supplied_password(&self) -> Option<&str> {
        self.supplied_password.as_deref()
    }
}

/// Evaluate whether `requester` may receive an asset classified as
///  `classification`.
pub fn decide(classification: &Classification, requester: &Requester) -> Decision {
    let allowed = match classification {
        Classification::Public => true,
        Classification::Private => requester.has_elevated_capability(),
        Classification::PasswordProtected { password } => match password.as_deref() {
            None | Some("") => true,
            Some(expected) => {
                requester.has_elevated_capability()
                    || requester.supplied_password() == Some(expected)
            }
        },
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
