// src/interception/runtime.rs
//! Boundary to the external hooking runtime
//!
//! Class lookup, method patching and process attachment belong to the host
//! runtime (an Xposed/Zygisk style loader). The engine only consumes the
//! narrow capability below: "run this closure after that method returns,
//! in this process".

use crate::platform::{CellLocation, ScanResult};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// A hookable method, addressed by class and method name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodTarget {
    pub class_name: &'static str,
    pub method_name: &'static str,
}

impl MethodTarget {
    pub const fn new(class_name: &'static str, method_name: &'static str) -> Self {
        Self {
            class_name,
            method_name,
        }
    }
}

impl fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_name, self.method_name)
    }
}

/// Return value of a hooked method
#[derive(Debug, Clone, PartialEq)]
pub enum HookValue {
    Null,
    Bool(bool),
    Double(f64),
    ScanResults(Vec<ScanResult>),
    CellLocation(CellLocation),
}

impl HookValue {
    pub fn is_null(&self) -> bool {
        matches!(self, HookValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HookValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HookValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_scan_results(&self) -> Option<&[ScanResult]> {
        match self {
            HookValue::ScanResults(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_cell_location(&self) -> Option<&CellLocation> {
        match self {
            HookValue::CellLocation(v) => Some(v),
            _ => None,
        }
    }
}

/// State of one intercepted call after the original method ran
#[derive(Debug)]
pub struct CallFrame {
    result: HookValue,
    replaced: bool,
}

impl CallFrame {
    pub fn new(result: HookValue) -> Self {
        Self {
            result,
            replaced: false,
        }
    }

    pub fn result(&self) -> &HookValue {
        &self.result
    }

    pub fn set_result(&mut self, value: HookValue) {
        self.result = value;
        self.replaced = true;
    }

    pub fn was_replaced(&self) -> bool {
        self.replaced
    }

    pub fn into_result(self) -> HookValue {
        self.result
    }
}

/// Closure run after the original method returns
pub type PostHook = Arc<dyn Fn(&mut CallFrame) + Send + Sync>;

/// Why the runtime could not register a hook
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HookError {
    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("runtime rejected hook: {0}")]
    Rejected(String),
}

/// Hooking capability supplied by the host runtime for one process
pub trait HookRuntime {
    /// API level of the running OS
    fn sdk_int(&self) -> u32;

    /// Register `hook` to run after every call to `target`
    fn hook_after(&self, target: &MethodTarget, hook: PostHook) -> Result<(), HookError>;
}

/// Register through `runtime`, reporting a panicking runtime as a failure
pub fn register_hook(
    runtime: &dyn HookRuntime,
    target: &MethodTarget,
    hook: PostHook,
) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| runtime.hook_after(target, hook))) {
        Ok(outcome) => outcome.map_err(|e| e.to_string()),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("runtime panicked: {}", message))
        }
    }
}

/// Process-load notification delivered by the host runtime
pub struct LoadPackageParam<'a> {
    pub package_name: &'a str,
    pub runtime: &'a dyn HookRuntime,
}

impl<'a> LoadPackageParam<'a> {
    pub fn new(package_name: &'a str, runtime: &'a dyn HookRuntime) -> Self {
        Self {
            package_name,
            runtime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let target = MethodTarget::new("android.location.Location", "getLatitude");
        assert_eq!(target.to_string(), "android.location.Location#getLatitude");
    }

    struct PanickingRuntime;

    impl HookRuntime for PanickingRuntime {
        fn sdk_int(&self) -> u32 {
            34
        }

        fn hook_after(&self, _target: &MethodTarget, _hook: PostHook) -> Result<(), HookError> {
            panic!("lookup exploded")
        }
    }

    #[test]
    fn test_register_hook_contains_runtime_panic() {
        let target = MethodTarget::new("android.location.Location", "getLatitude");
        let hook: PostHook = Arc::new(|_frame: &mut CallFrame| {});

        let outcome = register_hook(&PanickingRuntime, &target, hook);
        assert_eq!(outcome, Err("runtime panicked: lookup exploded".to_string()));
    }

    #[test]
    fn test_call_frame_replacement() {
        let mut frame = CallFrame::new(HookValue::Double(1.0));
        assert!(!frame.was_replaced());

        frame.set_result(HookValue::Double(2.0));
        assert!(frame.was_replaced());
        assert_eq!(frame.into_result().as_f64(), Some(2.0));
    }

    #[test]
    fn test_value_accessors() {
        assert!(HookValue::Null.is_null());
        assert_eq!(HookValue::Bool(true).as_bool(), Some(true));
        assert_eq!(HookValue::Bool(true).as_f64(), None);
        assert_eq!(HookValue::ScanResults(vec![]).as_scan_results().map(|s| s.len()), Some(0));
        assert!(HookValue::Null.as_cell_location().is_none());
    }
}
