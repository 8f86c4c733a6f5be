use crate::error::ApiError;

/// Identity of whoever is making the request, as asserted by the upstream gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub account_id: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(account_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            account_id: account_id.into(),
            is_admin,
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied)
        }
    }

    pub fn require_self_or_admin(&self, account_id: &str) -> Result<(), ApiError> {
        if self.is_admin || self.account_id == account_id {
            Ok(())
        } else {
            Err(ApiError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_checks() {
        let alice = Caller::new("alice", false);
        assert!(alice.require_self_or_admin("alice").is_ok());
        assert!(matches!(
            alice.require_self_or_admin("bob"),
            Err(ApiError::PermissionDenied)
        ));
        assert!(alice.require_admin().is_err());

        let admin = Caller::new("root", true);
        assert!(admin.require_self_or_admin("bob").is_ok());
        assert!(admin.require_admin().is_ok());
    }
}
