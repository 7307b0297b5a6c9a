//! # host-cleanup
//!
//! Returns a cluster agent host to a clean state before it is re-provisioned
//! or the agent is uninstalled.
//!
//! The agent's host check writes a manifest of what it installed. This crate
//! reads that manifest and removes, in a fixed order:
//!
//! - **Processes** left running by the agent's services
//! - **Packages** through the host's package manager (yum, zypper or apt)
//! - **Users**, their home directories, the shared group, and files they own in `/tmp`
//! - **Directories** listed in the manifest plus leftover per-run temp directories
//! - **Repository files** declaring the listed repositories
//! - **Alternatives** registrations and their configuration directories
//!
//! Every step is best-effort: failures are logged and recorded in a
//! [`cleaner::CleanupReport`], and the run always goes on to the next item.

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod manifest;
pub mod system;
