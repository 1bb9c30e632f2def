pub mod auth;
pub mod readings;
pub mod time_range;
pub mod validator;

pub use auth::AuthGate;
pub use readings::ReadingService;
pub use time_range::TimeRange;
pub use validator::SchemaVariant;
