//! Role predicates and the policies built from them.
//!
//! A [`Policy`] is an OR over [`Rule`]s, optionally preceded by an
//! "authenticated for writes" gate. Every endpoint picks one of the named
//! policies and checks it twice: once against the collection before any
//! lookup, and once against the object for retrieve/update/delete.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_MODERATOR};
use crate::types::DbId;

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const NOT_PERMITTED: &str = "You do not have permission to perform this action.";

/// Whether the request only reads state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

impl Action {
    /// `GET`, `HEAD` and `OPTIONS` are reads; every other method writes.
    pub fn from_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Action::Read,
            _ => Action::Write,
        }
    }
}

/// The authenticated user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: String,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_moderator(&self) -> bool {
        self.role == ROLE_MODERATOR
    }
}

/// What the request acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A list or create endpoint.
    Collection,
    /// A single stored object, with its author when it has one.
    Object { owner: Option<DbId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Admin,
    Moderator,
    /// The actor authored the object. On a collection, any actor may create
    /// an object they will own.
    Owner,
    ReadOnly,
    Authenticated,
}

impl Rule {
    pub fn holds(self, actor: Option<&Actor>, action: Action, target: Target) -> bool {
        match self {
            Rule::Admin => actor.is_some_and(Actor::is_admin),
            Rule::Moderator => actor.is_some_and(Actor::is_moderator),
            Rule::Owner => match (actor, target) {
                (Some(_), Target::Collection) => true,
                (Some(actor), Target::Object { owner }) => owner == Some(actor.id),
                (None, _) => false,
            },
            Rule::ReadOnly => action == Action::Read,
            Rule::Authenticated => actor.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Policy {
    /// Reject anonymous writes before consulting `any_of`.
    pub authenticated_writes: bool,
    pub any_of: &'static [Rule],
}

impl Policy {
    /// Catalog entries and titles: admins write, everyone reads.
    pub const ADMIN_OR_READ_ONLY: Policy = Policy {
        authenticated_writes: false,
        any_of: &[Rule::Admin, Rule::ReadOnly],
    };

    /// Reviews and comments: authors and staff write, everyone reads.
    pub const AUTHOR_OR_STAFF: Policy = Policy {
        authenticated_writes: true,
        any_of: &[Rule::Owner, Rule::ReadOnly, Rule::Admin, Rule::Moderator],
    };

    /// User management.
    pub const ADMIN_ONLY: Policy = Policy {
        authenticated_writes: true,
        any_of: &[Rule::Admin],
    };

    /// The caller's own profile.
    pub const SELF: Policy = Policy {
        authenticated_writes: true,
        any_of: &[Rule::Authenticated],
    };

    /// Returns `Unauthorized` for anonymous denials and `Forbidden` otherwise.
    pub fn check(
        &self,
        actor: Option<&Actor>,
        action: Action,
        target: Target,
    ) -> Result<(), CoreError> {
        if self.authenticated_writes && action == Action::Write && actor.is_none() {
            return Err(CoreError::Unauthorized(NOT_AUTHENTICATED.into()));
        }

        if self
            .any_of
            .iter()
            .any(|rule| rule.holds(actor, action, target))
        {
            return Ok(());
        }

        match actor {
            None => Err(CoreError::Unauthorized(NOT_AUTHENTICATED.into())),
            Some(_) => Err(CoreError::Forbidden(NOT_PERMITTED.into())),
        }
    }
}
