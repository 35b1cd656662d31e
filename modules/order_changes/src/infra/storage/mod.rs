pub mod entity;
pub mod migrations;
pub mod references;
pub mod sea_orm_repo;

pub use references::SeaOrmReferenceDirectory;
pub use sea_orm_repo::SeaOrmOrderChangesRepository;
