/// Authorization policies
///
/// Two per-route policies cover every mutation in the API. Reads always
/// pass; writes are gated on either ownership of the record or admin
/// standing. Policies are pure so handlers can check them before touching
/// the database row.
use actix_web::http::Method;

use crate::error::{AppError, Result};
use crate::middleware::Actor;

/// Write access policy evaluated against the record's owner.
pub trait AccessPolicy {
    fn allows(&self, method: &Method, actor: &Actor, owner_id: i64) -> bool;
}

/// Safe methods pass; writes require the requester to own the record.
pub struct OwnerOrReadOnly;

/// Safe methods pass; writes require staff or superuser standing.
pub struct AdminOrReadOnly;

fn is_safe(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

impl AccessPolicy for OwnerOrReadOnly {
    fn allows(&self, method: &Method, actor: &Actor, owner_id: i64) -> bool {
        is_safe(method) || actor.id == owner_id
    }
}

impl AccessPolicy for AdminOrReadOnly {
    fn allows(&self, method: &Method, actor: &Actor, _owner_id: i64) -> bool {
        is_safe(method) || actor.is_admin()
    }
}

/// Check a policy and turn a refusal into Forbidden.
pub fn enforce<P: AccessPolicy>(
    policy: &P,
    method: &Method,
    actor: &Actor,
    owner_id: i64,
) -> Result<()> {
    if policy.allows(method, actor, owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64) -> Actor {
        Actor {
            id,
            username: format!("user{id}"),
            is_staff: false,
            is_superuser: false,
        }
    }

    fn staff(id: i64) -> Actor {
        Actor {
            is_staff: true,
            ..member(id)
        }
    }

    #[test]
    fn reads_pass_for_everybody() {
        assert!(OwnerOrReadOnly.allows(&Method::GET, &member(2), 1));
        assert!(AdminOrReadOnly.allows(&Method::GET, &member(2), 1));
    }

    #[test]
    fn owner_policy_gates_writes_on_ownership() {
        assert!(OwnerOrReadOnly.allows(&Method::PUT, &member(1), 1));
        assert!(!OwnerOrReadOnly.allows(&Method::PUT, &member(2), 1));
        assert!(!OwnerOrReadOnly.allows(&Method::DELETE, &staff(2), 1));
    }

    #[test]
    fn admin_policy_ignores_ownership() {
        assert!(AdminOrReadOnly.allows(&Method::POST, &staff(2), 1));
        assert!(!AdminOrReadOnly.allows(&Method::POST, &member(1), 1));
    }

    #[test]
    fn enforce_maps_refusal_to_forbidden() {
        let err = enforce(&OwnerOrReadOnly, &Method::DELETE, &member(2), 1).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
