//! Repository layer: one zero-sized struct per table, methods take `&PgPool`.

pub mod category_repo;
pub mod contact_repo;
pub mod expert_repo;
pub mod instrument_repo;
pub mod learning_repo;
pub mod media_repo;
pub mod session_repo;
pub mod tuner_repo;
pub mod tutorial_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use contact_repo::ContactRepo;
pub use expert_repo::ExpertRepo;
pub use instrument_repo::InstrumentRepo;
pub use learning_repo::LearningRepo;
pub use media_repo::{MediaRepo, NewMedia};
pub use session_repo::SessionRepo;
pub use tuner_repo::TunerRepo;
pub use tutorial_repo::TutorialRepo;
pub use user_repo::UserRepo;
