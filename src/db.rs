pub mod user_repo;
pub use user_repo::UserRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod guest_repo;
pub use guest_repo::GuestRepository;
pub mod authz_repo;
pub use authz_repo::PgAuthzStore;
