//! Storage permission checks
//!
//! Android grants storage access either at install time (before API 23) or
//! at runtime, where the user can revoke it from system settings at any
//! moment. The answer is therefore never cached.

#[cfg(target_os = "android")]
mod android;

#[cfg(target_os = "android")]
pub use android::*;

#[cfg(test)]
use mockall::automock;

pub const READ_EXTERNAL_STORAGE: &str = "android.permission.READ_EXTERNAL_STORAGE";

/// First API level (Android 6.0 Marshmallow) with runtime permission grants
pub const RUNTIME_PERMISSIONS_SDK: i32 = 23;

/// Result of a storage permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePermissionStatus {
    /// Permission is granted, can read external storage
    Granted,
    /// Permission denied, need to request it
    Denied,
}

impl From<bool> for StoragePermissionStatus {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

/// Host process state consulted by [`has_storage_read_access`]
#[cfg_attr(test, automock)]
pub trait PermissionContext {
    /// Platform API level of the running system
    fn sdk_version(&self) -> i32;

    /// Whether `permission` is currently granted to the calling process
    fn is_permission_granted(&self, permission: &str) -> bool;
}

/// Whether the process may currently read shared storage.
///
/// Below [`RUNTIME_PERMISSIONS_SDK`] the manifest declaration is enough;
/// from there on the live grant state decides.
pub fn has_storage_read_access(context: &impl PermissionContext) -> bool {
    if context.sdk_version() < RUNTIME_PERMISSIONS_SDK {
        return true;
    }
    context.is_permission_granted(READ_EXTERNAL_STORAGE)
}

/// Context for desktop hosts, where file access is governed by the OS
/// rather than by granted permissions.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostContext;

impl PermissionContext for HostContext {
    fn sdk_version(&self) -> i32 {
        0
    }

    fn is_permission_granted(&self, _permission: &str) -> bool {
        true
    }
}

/// Check if the app may read external storage.
///
/// On non-Android platforms, always returns `Granted`.
#[cfg(not(target_os = "android"))]
pub fn check_storage_permission() -> StoragePermissionStatus {
    has_storage_read_access(&HostContext).into()
}

/// Request storage permission.
///
/// On non-Android platforms, this is a no-op.
/// On Android, opens the app's settings page where storage access can be granted.
///
/// Returns `true` if the request was initiated successfully.
#[cfg(not(target_os = "android"))]
pub fn request_storage_permission() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(21)]
    #[case(22)]
    fn test_static_permission_model_is_always_granted(#[case] sdk: i32) {
        let mut context = MockPermissionContext::new();
        context.expect_sdk_version().return_const(sdk);
        context.expect_is_permission_granted().never();

        assert!(has_storage_read_access(&context));
    }

    #[rstest]
    #[case(23, true)]
    #[case(23, false)]
    #[case(29, true)]
    #[case(34, false)]
    fn test_runtime_permission_model_reflects_grant(#[case] sdk: i32, #[case] granted: bool) {
        let mut context = MockPermissionContext::new();
        context.expect_sdk_version().return_const(sdk);
        context
            .expect_is_permission_granted()
            .with(eq(READ_EXTERNAL_STORAGE))
            .times(1)
            .return_const(granted);

        assert_eq!(has_storage_read_access(&context), granted);
    }

    #[test]
    fn test_grant_is_queried_on_every_call() {
        let mut context = MockPermissionContext::new();
        context.expect_sdk_version().return_const(30);
        let mut calls = 0;
        context
            .expect_is_permission_granted()
            .times(2)
            .returning(move |_| {
                calls += 1;
                // Revoked from settings after the first check
                calls == 1
            });

        assert!(has_storage_read_access(&context));
        assert!(!has_storage_read_access(&context));
    }

    #[test]
    fn test_host_context_is_granted() {
        assert!(has_storage_read_access(&HostContext));
        assert_eq!(check_storage_permission(), StoragePermissionStatus::Granted);
        assert!(request_storage_permission());
    }

    #[test]
    fn test_status_from_bool() {
        assert_eq!(StoragePermissionStatus::from(true), StoragePermissionStatus::Granted);
        assert_eq!(StoragePermissionStatus::from(false), StoragePermissionStatus::Denied);
    }
}
