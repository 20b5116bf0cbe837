//! Repository traits, one per record type.

mod datasets;
mod nominations;
mod sessions;

pub use datasets::DatasetRepo;
pub use nominations::NominationRepo;
pub use sessions::EditSessionRepo;
