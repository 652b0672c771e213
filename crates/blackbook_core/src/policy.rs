//! Universe access policy.
//!
//! # Responsibility
//! - Decide whether an actor may perform a verb on a universe or on the
//!   resources nested under it.
//! - Select the failure kind a denial surfaces as.
//!
//! # Invariants
//! - Evaluation is a pure function of (actor, universe, verb).
//! - The owner is allowed every verb.
//! - Which verbs collaborators may perform is decided by `required_role`
//!   alone; call sites never choose the failure kind themselves.
//! - Authentication happened before any call into this module.

use crate::error::{BlackBookError, BlackBookResult};
use crate::model::resource::ResourceKind;
use crate::model::universe::Universe;
use crate::model::user::UserId;

/// Verbs on the universe record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniverseAction {
    View,
    Update,
    Destroy,
    AddCollaborator,
    RemoveCollaborator,
}

impl UniverseAction {
    /// Phrase completing "to {verb} it".
    pub fn verb(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Destroy => "destroy",
            Self::AddCollaborator => "add collaborators to",
            Self::RemoveCollaborator => "remove collaborators from",
        }
    }
}

/// Verbs on a resource nested under a universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    Read,
    Create,
    Update,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Universe(UniverseAction),
    Resource(ResourceKind, ResourceAction),
}

/// Membership level a verb demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Owner,
    OwnerOrCollaborator,
}

/// Actor's membership in one universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Collaborator,
    Outsider,
}

#[derive(Debug)]
pub enum Decision {
    Allowed,
    Denied(BlackBookError),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn into_result(self) -> BlackBookResult<()> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(err) => Err(err),
        }
    }
}

/// The verb table.
pub fn required_role(verb: Verb) -> RequiredRole {
    match verb {
        Verb::Universe(UniverseAction::View) => RequiredRole::OwnerOrCollaborator,
        Verb::Universe(
            UniverseAction::Update
            | UniverseAction::Destroy
            | UniverseAction::AddCollaborator
            | UniverseAction::RemoveCollaborator,
        ) => RequiredRole::Owner,
        Verb::Resource(_, _) => RequiredRole::OwnerOrCollaborator,
    }
}

pub fn role_of(actor: UserId, universe: &Universe) -> Role {
    if universe.is_owner(actor) {
        Role::Owner
    } else if universe.is_collaborator(actor) {
        Role::Collaborator
    } else {
        Role::Outsider
    }
}

/// Evaluates `verb` for `actor` on `universe`.
pub fn evaluate(actor: UserId, universe: &Universe, verb: Verb) -> Decision {
    let required = required_role(verb);
    let allowed = match (role_of(actor, universe), required) {
        (Role::Owner, _) => true,
        (Role::Collaborator, RequiredRole::OwnerOrCollaborator) => true,
        (Role::Collaborator, RequiredRole::Owner) | (Role::Outsider, _) => false,
    };
    if allowed {
        return Decision::Allowed;
    }

    Decision::Denied(match verb {
        Verb::Universe(action) => BlackBookError::ForbiddenUniverseAction {
            verb: action.verb(),
            collaborators_allowed: required == RequiredRole::OwnerOrCollaborator,
        },
        Verb::Resource(kind, _) => BlackBookError::ForbiddenUniverseResource {
            universe_id: universe.id,
            kind,
        },
    })
}

/// `evaluate` followed by `Decision::into_result`.
pub fn authorize(actor: UserId, universe: &Universe, verb: Verb) -> BlackBookResult<()> {
    evaluate(actor, universe, verb).into_result()
}

#[cfg(test)]
mod tests {
    use super::{evaluate, required_role, RequiredRole, ResourceAction, UniverseAction, Verb};
    use crate::error::BlackBookError;
    use crate::model::resource::ResourceKind;
    use crate::model::universe::Universe;

    const OWNER: i64 = 1;
    const COLLABORATOR: i64 = 2;
    const STRANGER: i64 = 3;

    const UNIVERSE_ACTIONS: [UniverseAction; 5] = [
        UniverseAction::View,
        UniverseAction::Update,
        UniverseAction::Destroy,
        UniverseAction::AddCollaborator,
        UniverseAction::RemoveCollaborator,
    ];
    const RESOURCE_ACTIONS: [ResourceAction; 4] = [
        ResourceAction::Read,
        ResourceAction::Create,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];
    const NESTED_KINDS: [ResourceKind; 7] = [
        ResourceKind::Character,
        ResourceKind::Location,
        ResourceKind::Item,
        ResourceKind::Trait,
        ResourceKind::Image,
        ResourceKind::ImageTag,
        ResourceKind::Relationship,
    ];

    fn universe() -> Universe {
        Universe {
            id: 12,
            name: "Earthsea".to_string(),
            owner_id: OWNER,
            collaborator_ids: vec![COLLABORATOR],
            discarded_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn all_verbs() -> Vec<Verb> {
        let mut verbs: Vec<Verb> = UNIVERSE_ACTIONS.iter().copied().map(Verb::Universe).collect();
        for kind in NESTED_KINDS {
            for action in RESOURCE_ACTIONS {
                verbs.push(Verb::Resource(kind, action));
            }
        }
        verbs
    }

    #[test]
    fn owner_is_allowed_every_verb() {
        let universe = universe();
        for verb in all_verbs() {
            assert!(evaluate(OWNER, &universe, verb).is_allowed(), "{verb:?}");
        }
    }

    #[test]
    fn collaborator_is_allowed_every_nested_resource_verb() {
        let universe = universe();
        for kind in NESTED_KINDS {
            for action in RESOURCE_ACTIONS {
                let decision = evaluate(COLLABORATOR, &universe, Verb::Resource(kind, action));
                assert!(decision.is_allowed(), "{kind:?} {action:?}");
            }
        }
        assert!(evaluate(COLLABORATOR, &universe, Verb::Universe(UniverseAction::View)).is_allowed());
    }

    #[test]
    fn collaborator_is_denied_owner_only_universe_verbs() {
        let universe = universe();
        for action in UNIVERSE_ACTIONS
            .into_iter()
            .filter(|action| *action != UniverseAction::View)
        {
            let err = evaluate(COLLABORATOR, &universe, Verb::Universe(action))
                .into_result()
                .expect_err("owner-only verb");
            assert!(matches!(
                err,
                BlackBookError::ForbiddenUniverseAction {
                    collaborators_allowed: false,
                    ..
                }
            ));
        }
    }

    #[test]
    fn stranger_is_denied_nested_resources_with_universe_and_plural_in_message() {
        let universe = universe();
        let err = evaluate(
            STRANGER,
            &universe,
            Verb::Resource(ResourceKind::Character, ResourceAction::Read),
        )
        .into_result()
        .expect_err("stranger must be denied");
        assert_eq!(
            err.message(),
            "You must be an owner or collaborator for the universe with ID 12 to interact with its characters."
        );
    }

    #[test]
    fn stranger_viewing_universe_gets_collaborator_aware_message() {
        let universe = universe();
        let err = evaluate(STRANGER, &universe, Verb::Universe(UniverseAction::View))
            .into_result()
            .expect_err("stranger must be denied");
        assert_eq!(
            err.message(),
            "You must be an owner or collaborator of a universe to view it."
        );
    }

    #[test]
    fn destroy_is_the_owner_only_verb_in_the_table() {
        assert_eq!(
            required_role(Verb::Universe(UniverseAction::Destroy)),
            RequiredRole::Owner
        );
        assert_eq!(
            required_role(Verb::Resource(ResourceKind::Image, ResourceAction::Destroy)),
            RequiredRole::OwnerOrCollaborator
        );
    }

    #[test]
    fn evaluation_is_repeatable() {
        let universe = universe();
        let verb = Verb::Resource(ResourceKind::Item, ResourceAction::Update);
        for _ in 0..3 {
            assert!(evaluate(COLLABORATOR, &universe, verb).is_allowed());
            assert!(!evaluate(STRANGER, &universe, verb).is_allowed());
        }
    }
}
