pub mod auth;

pub mod courses;

pub mod payments;

pub mod system;

pub mod teachers;

pub mod users;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use payments::configure_payment_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;
