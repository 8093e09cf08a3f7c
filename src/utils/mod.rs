pub mod extractor;
pub mod identifier;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod slug;
pub mod validate;

pub use extractor::{SafeCourseIdI64, SafeSubscriptionIdI64};
pub use identifier::{IdentifierKind, detect_identifier};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
