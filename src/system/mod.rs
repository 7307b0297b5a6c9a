pub mod command;
pub mod os_family;
pub mod users;

pub use command::{CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner};
pub use os_family::OsFamily;
pub use users::{platform_resolver, NullUserResolver, UserResolver};
#[cfg(unix)]
pub use users::PosixUserResolver;
