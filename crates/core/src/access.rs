//! Per-operation access policy and representation-shape selection.
//!
//! Every resource operation the API exposes is named here, and the single
//! [`requirement`] table decides who may perform it. Handlers never encode
//! their own rules; they call [`authorize`] with their `(Resource, Operation)`.

use std::fmt;

use crate::error::CoreError;
use crate::roles::is_privileged;

/// A named collection exposed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Category,
    Instrument,
    Media,
    Expert,
    LearningContent,
    Contact,
    Tutorial,
    TunerConfiguration,
}

impl Resource {
    /// Entity name used in error messages.
    pub fn entity_name(self) -> &'static str {
        match self {
            Resource::Category => "Category",
            Resource::Instrument => "Instrument",
            Resource::Media => "Media",
            Resource::Expert => "Expert",
            Resource::LearningContent => "LearningContent",
            Resource::Contact => "Contact",
            Resource::Tutorial => "Tutorial",
            Resource::TunerConfiguration => "TunerConfiguration",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// An operation tag. Drives both the access check and the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    /// Read-only lookups hanging off a single row (e.g. an instrument's tutorials).
    SubResource,
    /// Multi-row state changes (contact mark-read / mark-unread).
    BulkAction,
    /// Multipart file upload creating a row.
    Upload,
}

impl Operation {
    /// Safe operations never modify state.
    pub fn is_safe(self) -> bool {
        matches!(
            self,
            Operation::List | Operation::Retrieve | Operation::SubResource
        )
    }
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, authenticated or not.
    Public,
    /// An authenticated caller with a privileged role.
    Admin,
}

/// The policy table: resource x operation -> requirement.
pub fn requirement(resource: Resource, op: Operation) -> Requirement {
    use Operation::*;
    use Resource::*;

    match (resource, op) {
        // Open resource: anyone may read and write learning content.
        (LearningContent, _) => Requirement::Public,

        // Split: anyone may submit a message, only admins see or touch them.
        (Contact, Create) => Requirement::Public,
        (Contact, _) => Requirement::Admin,

        // Admin-or-read-only for everything else.
        (Category | Instrument | Media | Expert | Tutorial | TunerConfiguration, op)
            if op.is_safe() =>
        {
            Requirement::Public
        }
        (Category | Instrument | Media | Expert | Tutorial | TunerConfiguration, _) => {
            Requirement::Admin
        }
    }
}

/// Check a caller against the policy table.
///
/// `caller_role` is `None` for unauthenticated requests. Missing credentials
/// map to [`CoreError::Unauthorized`]; insufficient role to
/// [`CoreError::Forbidden`].
pub fn authorize(
    resource: Resource,
    op: Operation,
    caller_role: Option<&str>,
) -> Result<(), CoreError> {
    match (requirement(resource, op), caller_role) {
        (Requirement::Public, _) => Ok(()),
        (Requirement::Admin, Some(role)) if is_privileged(role) => Ok(()),
        (Requirement::Admin, Some(_)) => Err(CoreError::Forbidden(format!(
            "Admin role required for this {resource} operation"
        ))),
        (Requirement::Admin, None) => Err(CoreError::Unauthorized(
            "Authentication credentials were not provided".into(),
        )),
    }
}

/// Response shape of a resource with separate grid and page representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Flat shape used for grids and for every write response.
    List,
    /// Nested shape with derived fields, used for single-item pages.
    Detail,
}

impl Shape {
    /// Only single-resource retrieval gets the nested shape.
    pub fn for_operation(op: Operation) -> Shape {
        match op {
            Operation::Retrieve => Shape::Detail,
            _ => Shape::List,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_USER};

    const WRITES: [Operation; 4] = [
        Operation::Create,
        Operation::Update,
        Operation::PartialUpdate,
        Operation::Destroy,
    ];

    #[test]
    fn admin_gated_resources_are_public_for_reads() {
        for resource in [
            Resource::Category,
            Resource::Instrument,
            Resource::Media,
            Resource::Expert,
            Resource::Tutorial,
            Resource::TunerConfiguration,
        ] {
            assert!(authorize(resource, Operation::List, None).is_ok());
            assert!(authorize(resource, Operation::Retrieve, None).is_ok());
            for op in WRITES {
                assert_eq!(requirement(resource, op), Requirement::Admin, "{resource} {op:?}");
            }
        }
    }

    #[test]
    fn anonymous_write_is_unauthorized() {
        let err = authorize(Resource::Instrument, Operation::Create, None).unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn non_admin_write_is_forbidden() {
        let err =
            authorize(Resource::Instrument, Operation::Destroy, Some(ROLE_USER)).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn admin_may_write() {
        for op in WRITES {
            assert!(authorize(Resource::Media, op, Some(ROLE_ADMIN)).is_ok());
        }
        assert!(authorize(Resource::Media, Operation::Upload, Some(ROLE_ADMIN)).is_ok());
    }

    #[test]
    fn learning_content_is_fully_open() {
        for op in WRITES.into_iter().chain([Operation::List, Operation::Retrieve]) {
            assert!(authorize(Resource::LearningContent, op, None).is_ok());
        }
    }

    #[test]
    fn contact_create_is_the_only_public_operation() {
        assert!(authorize(Resource::Contact, Operation::Create, None).is_ok());
        for op in [
            Operation::List,
            Operation::Retrieve,
            Operation::Update,
            Operation::PartialUpdate,
            Operation::Destroy,
            Operation::BulkAction,
        ] {
            assert_eq!(requirement(Resource::Contact, op), Requirement::Admin);
        }
    }

    #[test]
    fn sub_resources_are_public() {
        assert!(authorize(Resource::Instrument, Operation::SubResource, None).is_ok());
    }

    #[test]
    fn detail_shape_only_for_retrieve() {
        assert_eq!(Shape::for_operation(Operation::Retrieve), Shape::Detail);
        for op in [
            Operation::List,
            Operation::Create,
            Operation::Update,
            Operation::PartialUpdate,
        ] {
            assert_eq!(Shape::for_operation(op), Shape::List);
        }
    }
}
