//! Client half of the adboard dashboard: the session store that tracks who is
//! signed in, the route guard and route table built on top of it, and the
//! services and stores the session talks to.

pub mod app;
pub mod auth;
pub mod guard;
pub mod menu;
pub mod routes;
pub mod session;
pub mod store;

pub use self::auth::{AuthService, AuthenticationError, DirectoryAuthService, HttpAuthService};
pub use self::guard::{GuardOutcome, RouteRequirement, evaluate};
pub use self::routes::{Navigation, RouteTable};
pub use self::session::{Session, SessionStore};
pub use self::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
