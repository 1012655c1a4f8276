pub mod guard;

pub use guard::AuthGuard;
