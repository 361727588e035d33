//! Android-specific platform functionality
//!
//! Reaches the permission APIs of the hosting app through JNI.

use super::{
    PermissionContext, RUNTIME_PERMISSIONS_SDK, StoragePermissionStatus, has_storage_read_access,
};
use jni::JNIEnv;
use jni::objects::{JObject, JValue};
use std::cell::RefCell;

const PERMISSION_GRANTED: i32 = 0; // PackageManager.PERMISSION_GRANTED
const FLAG_ACTIVITY_NEW_TASK: i32 = 0x10000000;

/// Get the Android SDK version (Build.VERSION.SDK_INT)
fn get_sdk_version(env: &mut JNIEnv) -> Result<i32, jni::errors::Error> {
    let build_version = env.find_class("android/os/Build$VERSION")?;
    let sdk_int = env.get_static_field(build_version, "SDK_INT", "I")?;
    sdk_int.i()
}

/// context.checkCallingOrSelfPermission(permission)
fn check_permission(
    env: &mut JNIEnv,
    context: &JObject,
    permission: &str,
) -> Result<bool, jni::errors::Error> {
    let permission = env.new_string(permission)?;
    let result = env.call_method(
        context,
        "checkCallingOrSelfPermission",
        "(Ljava/lang/String;)I",
        &[JValue::Object(&permission.into())],
    )?;

    Ok(result.i()? == PERMISSION_GRANTED)
}

/// Open the app's details page in system settings, where the user can
/// grant storage access.
fn open_app_settings(env: &mut JNIEnv, context: &JObject) -> Result<(), jni::errors::Error> {
    let settings = env.find_class("android/provider/Settings")?;
    let action = env.get_static_field(
        settings,
        "ACTION_APPLICATION_DETAILS_SETTINGS",
        "Ljava/lang/String;",
    )?;

    let intent_class = env.find_class("android/content/Intent")?;
    let intent = env.new_object(
        intent_class,
        "(Ljava/lang/String;)V",
        &[JValue::Object(&action.l()?)],
    )?;

    // Uri.parse("package:" + packageName)
    let package_name: jni::objects::JString = env
        .call_method(context, "getPackageName", "()Ljava/lang/String;", &[])?
        .l()?
        .into();
    let package_name: String = env.get_string(&package_name)?.into();
    let uri_string = env.new_string(format!("package:{package_name}"))?;

    let uri_class = env.find_class("android/net/Uri")?;
    let uri = env.call_static_method(
        uri_class,
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&uri_string.into())],
    )?;

    env.call_method(
        &intent,
        "setData",
        "(Landroid/net/Uri;)Landroid/content/Intent;",
        &[JValue::Object(&uri.l()?)],
    )?;
    env.call_method(
        &intent,
        "addFlags",
        "(I)Landroid/content/Intent;",
        &[JValue::Int(FLAG_ACTIVITY_NEW_TASK)],
    )?;
    env.call_method(
        context,
        "startActivity",
        "(Landroid/content/Intent;)V",
        &[JValue::Object(&intent)],
    )?;

    Ok(())
}

/// [`PermissionContext`] answering from the live Android context.
///
/// JNI failures are logged; an unreadable SDK level is treated as the
/// runtime model and an unanswerable grant query as denied.
pub struct JniPermissionContext<'a, 'local> {
    env: RefCell<&'a mut JNIEnv<'local>>,
    context: &'a JObject<'a>,
}

impl<'a, 'local> JniPermissionContext<'a, 'local> {
    pub fn new(env: &'a mut JNIEnv<'local>, context: &'a JObject<'a>) -> Self {
        Self {
            env: RefCell::new(env),
            context,
        }
    }
}

impl PermissionContext for JniPermissionContext<'_, '_> {
    fn sdk_version(&self) -> i32 {
        let mut env = self.env.borrow_mut();
        get_sdk_version(&mut **env).unwrap_or_else(|e| {
            log::error!("Failed to read SDK version: {e}");
            RUNTIME_PERMISSIONS_SDK
        })
    }

    fn is_permission_granted(&self, permission: &str) -> bool {
        let mut env = self.env.borrow_mut();
        check_permission(&mut **env, self.context, permission).unwrap_or_else(|e| {
            log::error!("Failed to query {permission}: {e}");
            false
        })
    }
}

/// Helper to run JNI operations against the app context
fn with_jni<F, T>(f: F) -> Option<T>
where
    F: FnOnce(&mut JNIEnv, &JObject) -> Result<T, jni::errors::Error>,
{
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }.ok()?;
    let mut env = vm.attach_current_thread().ok()?;
    let context = unsafe { JObject::from_raw(ctx.context().cast()) };

    match f(&mut env, &context) {
        Ok(result) => Some(result),
        Err(e) => {
            log::error!("JNI error: {e}");
            None
        }
    }
}

/// Check if the app may read external storage.
pub fn check_storage_permission() -> StoragePermissionStatus {
    with_jni(|env, context| {
        let permissions = JniPermissionContext::new(env, context);
        let granted = has_storage_read_access(&permissions);
        log::info!("Storage read access granted: {granted}");
        Ok(StoragePermissionStatus::from(granted))
    })
    .unwrap_or(StoragePermissionStatus::Denied)
}

/// Request storage permission by opening the app's settings page.
///
/// Returns `true` if the settings page was opened successfully.
pub fn request_storage_permission() -> bool {
    with_jni(|env, context| open_app_settings(env, context)).is_some()
}
