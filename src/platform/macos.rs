use super::{ActiveWindow, PermissionOracle, SensorProvider};
use core_foundation::base::{CFGetTypeID, CFRelease, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::string::{CFString, CFStringRef};
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::window::{
    create_image, kCGNullWindowID, kCGWindowImageBestResolution, kCGWindowListOptionOnScreenOnly,
};
use objc2::rc::autoreleasepool;
use objc2_app_kit::NSWorkspace;
use std::ffi::c_void;
use std::ptr;

type AXUIElementRef = *const c_void;
type AXError = i32;

const AX_SUCCESS: AXError = 0;

// Accessibility C API; not covered by the objc2 framework crates.
#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: CFDictionaryRef) -> bool;
    fn AXUIElementCreateApplication(pid: i32) -> AXUIElementRef;
    fn AXUIElementCopyAttributeValue(
        element: AXUIElementRef,
        attribute: CFStringRef,
        value: *mut CFTypeRef,
    ) -> AXError;
    static kAXTrustedCheckOptionPrompt: CFStringRef;
}

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    // double CGEventSourceSecondsSinceLastEventType(CGEventSourceStateID, CGEventType)
    fn CGEventSourceSecondsSinceLastEventType(state: i32, event_type: u32) -> f64;
}

// kCGEventSourceStateHIDSystemState
const HID_SYSTEM_STATE: i32 = 1;
// kCGAnyInputEventType
const ANY_INPUT_EVENT_TYPE: u32 = u32::MAX;

pub struct MacSensor;

impl MacSensor {
    pub fn new() -> Self {
        Self
    }
}

impl SensorProvider for MacSensor {
    fn current_window(&self) -> Option<ActiveWindow> {
        autoreleasepool(|_| {
            let workspace = unsafe { NSWorkspace::sharedWorkspace() };
            let app = unsafe { workspace.frontmostApplication() }?;

            let app_name = unsafe { app.localizedName() }
                .map(|name| name.to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            // Without accessibility the AX title lookup cannot succeed;
            // report the app with an empty title instead of failing.
            if !unsafe { AXIsProcessTrusted() } {
                return Some(ActiveWindow {
                    app_name,
                    window_title: String::new(),
                });
            }

            let pid = unsafe { app.processIdentifier() };
            let window_title = focused_window_title(pid).unwrap_or_default();

            Some(ActiveWindow {
                app_name,
                window_title,
            })
        })
    }

    fn idle_seconds(&self) -> f64 {
        unsafe { CGEventSourceSecondsSinceLastEventType(HID_SYSTEM_STATE, ANY_INPUT_EVENT_TYPE) }
    }
}

/// Title of the focused window of the given app, via the AX attribute
/// chain. Any failure along the chain (no focused window, missing or
/// non-string title attribute) yields None.
fn focused_window_title(pid: i32) -> Option<String> {
    unsafe {
        let ax_app = AXUIElementCreateApplication(pid);
        if ax_app.is_null() {
            return None;
        }

        let focused_attr = CFString::from_static_string("AXFocusedWindow");
        let mut window: CFTypeRef = ptr::null();
        let err =
            AXUIElementCopyAttributeValue(ax_app, focused_attr.as_concrete_TypeRef(), &mut window);
        CFRelease(ax_app as CFTypeRef);
        if err != AX_SUCCESS || window.is_null() {
            return None;
        }

        let title_attr = CFString::from_static_string("AXTitle");
        let mut title: CFTypeRef = ptr::null();
        let err = AXUIElementCopyAttributeValue(
            window as AXUIElementRef,
            title_attr.as_concrete_TypeRef(),
            &mut title,
        );
        CFRelease(window);
        if err != AX_SUCCESS || title.is_null() {
            return None;
        }

        if CFGetTypeID(title) != CFString::type_id() {
            CFRelease(title);
            return None;
        }

        Some(CFString::wrap_under_create_rule(title as CFStringRef).to_string())
    }
}

pub struct MacPermissions;

impl MacPermissions {
    pub fn new() -> Self {
        Self
    }
}

impl PermissionOracle for MacPermissions {
    fn has_window_access(&self) -> bool {
        unsafe { AXIsProcessTrusted() }
    }

    /// Shows the system accessibility consent dialog. The grant itself
    /// lands asynchronously in TCC; callers poll `has_window_access`.
    fn request_window_access(&self) {
        unsafe {
            let key = CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt);
            let options = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
            AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef());
        }
    }

    /// A trivial 10x10 capture is enough to register the process with TCC
    /// and surface the screen-recording consent prompt. The image itself
    /// is discarded.
    fn request_content_access(&self) {
        let bounds = CGRect::new(&CGPoint::new(0.0, 0.0), &CGSize::new(10.0, 10.0));
        let _ = create_image(
            bounds,
            kCGWindowListOptionOnScreenOnly,
            kCGNullWindowID,
            kCGWindowImageBestResolution,
        );
    }
}
