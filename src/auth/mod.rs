pub mod claims;
pub mod extractor;
pub mod jwt;
pub mod policy;

pub use claims::Claims;
pub use extractor::AuthenticatedUser;
pub use jwt::JwtService;
