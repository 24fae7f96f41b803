//! Staff membership predicate

use crate::config::AccessConfig;

/// Decides whether an email belongs to staff
#[derive(Debug, Clone, Default)]
pub struct StaffPolicy {
    domains: Vec<String>,
    emails: Vec<String>,
}

impl StaffPolicy {
    pub fn from_config(config: &AccessConfig) -> Self {
        Self {
            domains: config.staff_domains.clone(),
            emails: config.staff_emails.clone(),
        }
    }

    pub fn is_staff(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if self.emails.iter().any(|e| *e == email) {
            return true;
        }
        match email.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                self.domains.iter().any(|d| d == domain)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> StaffPolicy {
        StaffPolicy::from_config(
            &AccessConfig::new()
                .with_staff_domains(["x.com"])
                .with_staff_email("ops@partner.io"),
        )
    }

    #[test]
    fn test_domain_membership() {
        let p = policy();
        assert!(p.is_staff("staff@x.com"));
        assert!(p.is_staff("  Staff@X.COM "));
        assert!(!p.is_staff("notstaff@y.com"));
        assert!(!p.is_staff("staff@sub.x.com"));
        assert!(!p.is_staff("@x.com"));
        assert!(!p.is_staff("x.com"));
    }

    #[test]
    fn test_explicit_emails() {
        let p = policy();
        assert!(p.is_staff("ops@partner.io"));
        assert!(!p.is_staff("dev@partner.io"));
    }

    #[test]
    fn test_empty_policy_denies_everyone() {
        assert!(!StaffPolicy::default().is_staff("staff@x.com"));
    }
}
