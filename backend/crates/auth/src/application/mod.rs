//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod current_identity;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod tokens;

// Re-exports
pub use authenticate::{AccessVerifier, AuthContext, TokenSource, verify_presented_token};
pub use config::AuthConfig;
pub use current_identity::CurrentIdentityUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
