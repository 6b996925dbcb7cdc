pub mod auth;
pub mod event_service;
pub mod guest_service;
pub mod member_service;
pub mod rbac_service;
pub mod supplier_service;

pub use auth::AuthService;
pub use event_service::EventService;
pub use guest_service::GuestService;
pub use member_service::MemberService;
pub use rbac_service::RbacService;
pub use supplier_service::SupplierService;
