//! Request handlers, one module per resource.
//!
//! Every handler takes a [`Caller`](crate::middleware::auth::Caller) and asks
//! the access policy before touching the database. Handlers delegate to the
//! repositories in `baja_db` and shape rows through
//! [`representation`](crate::representation).

pub mod auth;
pub mod categories;
pub mod contact;
pub mod experts;
pub mod instruments;
pub mod learning;
pub mod media;
pub mod tuner;
pub mod tutorials;

use baja_core::access::Resource;
use baja_core::error::CoreError;
use baja_core::types::DbId;
use baja_db::repositories::InstrumentRepo;
use baja_db::DbPool;

use crate::error::{AppError, AppResult};

/// 404 for a row of `resource` that does not exist.
pub(crate) fn not_found(resource: Resource, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: resource.entity_name(),
        id,
    })
}

/// Reject a write that points at an instrument that does not exist.
pub(crate) async fn ensure_instrument(pool: &DbPool, id: DbId) -> AppResult<()> {
    if InstrumentRepo::exists(pool, id).await? {
        Ok(())
    } else {
        Err(CoreError::field(
            "instrument",
            format!("Instrument {id} does not exist"),
        )
        .into())
    }
}
