//! Request authorization.
//!
//! A request is matched against a fixed table of (method, path prefix, tier)
//! rules, evaluated in order:
//!
//! 1. no principal: unauthenticated
//! 2. a `Privileged` rule matches: the principal must be an administrator
//! 3. otherwise the trailing path segment must name the principal
//!
//! Only `SelfScoped` routes carry a username segment. Any other protected
//! route that is not privileged-only has no segment to compare, so it is
//! forbidden to every principal, administrators included.

use axum::http::Method;

use crate::auth::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Privileged,
    SelfScoped,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub method: &'static str,
    pub prefix: &'static str,
    pub tier: Tier,
}

impl Rule {
    const fn new(method: &'static str, prefix: &'static str, tier: Tier) -> Self {
        Self { method, prefix, tier }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == method.as_str() && path.starts_with(self.prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthenticated,
    Forbidden,
}

pub const RULES: &[Rule] = &[
    Rule::new("POST", "/organizations", Tier::Privileged),
    Rule::new("PATCH", "/organizations/", Tier::Privileged),
    Rule::new("DELETE", "/organizations/", Tier::Privileged),
    Rule::new("POST", "/users", Tier::Privileged),
    Rule::new("GET", "/users", Tier::Privileged),
    Rule::new("PATCH", "/users/", Tier::Privileged),
    Rule::new("DELETE", "/users/", Tier::Privileged),
    Rule::new("GET", "/applications/", Tier::SelfScoped),
    Rule::new("POST", "/applications/", Tier::SelfScoped),
];

pub fn decide(principal: Option<&Principal>, method: &Method, path: &str) -> Decision {
    decide_with(RULES, principal, method, path)
}

pub fn decide_with(rules: &[Rule], principal: Option<&Principal>, method: &Method, path: &str) -> Decision {
    let Some(principal) = principal else {
        return Decision::Unauthenticated;
    };

    let rule = rules.iter().find(|r| r.matches(method, path));

    if let Some(Rule { tier: Tier::Privileged, .. }) = rule {
        return if principal.is_admin {
            Decision::Allow
        } else {
            Decision::Forbidden
        };
    }

    let segment = match rule {
        Some(Rule { tier: Tier::SelfScoped, .. }) => trailing_segment(path),
        _ => None,
    };

    if segment == Some(principal.username.as_str()) {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}

fn trailing_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}
