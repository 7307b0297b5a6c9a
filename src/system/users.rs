/// Maps account names to numeric user IDs
pub trait UserResolver {
    /// Resolve every non-empty name; names that do not resolve are logged and dropped
    fn resolve_uids(&self, users: &[String]) -> Vec<u32>;
}

/// Resolver backed by the local passwd database
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixUserResolver;

#[cfg(unix)]
impl UserResolver for PosixUserResolver {
    fn resolve_uids(&self, users: &[String]) -> Vec<u32> {
        let mut uids = Vec::new();
        for user in users.iter().filter(|u| !u.is_empty()) {
            match nix::unistd::User::from_name(user) {
                Ok(Some(entry)) => uids.push(entry.uid.as_raw()),
                Ok(None) => tracing::warn!("Cannot find user : {}", user),
                Err(e) => tracing::warn!("Cannot find user : {}, {}", user, e),
            }
        }
        uids
    }
}

/// Resolver for targets without POSIX ownership; resolves nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUserResolver;

impl UserResolver for NullUserResolver {
    fn resolve_uids(&self, _users: &[String]) -> Vec<u32> {
        Vec::new()
    }
}

/// Pick the resolver for the platform this binary runs on
pub fn platform_resolver() -> Box<dyn UserResolver> {
    #[cfg(unix)]
    {
        Box::new(PosixUserResolver)
    }
    #[cfg(not(unix))]
    {
        Box::new(NullUserResolver)
    }
}
