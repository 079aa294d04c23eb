// src/interception/simulated.rs
//! In-process stand-in for the hooking runtime
//!
//! Records registrations and lets callers "invoke" a hooked method with a
//! chosen original result. Used by tests and the probe's dry run.

use crate::interception::runtime::{CallFrame, HookError, HookRuntime, HookValue, MethodTarget, PostHook};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Simulated runtime for one process
pub struct SimulatedRuntime {
    sdk_int: u32,
    hooks: DashMap<MethodTarget, Vec<PostHook>>,
    missing_classes: DashSet<String>,
    missing_methods: DashSet<String>,
    registrations: AtomicUsize,
}

impl SimulatedRuntime {
    pub fn new(sdk_int: u32) -> Self {
        Self {
            sdk_int,
            hooks: DashMap::new(),
            missing_classes: DashSet::new(),
            missing_methods: DashSet::new(),
            registrations: AtomicUsize::new(0),
        }
    }

    /// Pretend a class is not loadable in this process
    pub fn without_class(self, class_name: impl Into<String>) -> Self {
        self.missing_classes.insert(class_name.into());
        self
    }

    /// Pretend a method does not exist on this OS revision
    pub fn without_method(self, target: MethodTarget) -> Self {
        self.missing_methods.insert(target.to_string());
        self
    }

    /// Mark `spec` missing: `Class#method` hides a method, `Class` a class
    pub fn hide(&self, spec: &str) {
        if spec.contains('#') {
            self.missing_methods.insert(spec.to_string());
        } else {
            self.missing_classes.insert(spec.to_string());
        }
    }

    /// Run the post hooks registered on `target` over `original`
    pub fn invoke(&self, target: &MethodTarget, original: HookValue) -> HookValue {
        let mut frame = CallFrame::new(original);
        if let Some(hooks) = self.hooks.get(target) {
            for hook in hooks.iter() {
                hook(&mut frame);
            }
        }
        frame.into_result()
    }

    pub fn hook_count(&self, target: &MethodTarget) -> usize {
        self.hooks.get(target).map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_hooked(&self, target: &MethodTarget) -> bool {
        self.hook_count(target) > 0
    }

    /// Successful registrations so far
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::Relaxed)
    }
}

impl HookRuntime for SimulatedRuntime {
    fn sdk_int(&self) -> u32 {
        self.sdk_int
    }

    fn hook_after(&self, target: &MethodTarget, hook: PostHook) -> Result<(), HookError> {
        if self.missing_classes.contains(target.class_name) {
            return Err(HookError::ClassNotFound(target.class_name.to_string()));
        }
        let name = target.to_string();
        if self.missing_methods.contains(&name) {
            return Err(HookError::MethodNotFound(name));
        }

        self.hooks.entry(*target).or_default().push(hook);
        self.registrations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const TARGET: MethodTarget = MethodTarget::new("android.location.Location", "getLatitude");

    #[test]
    fn test_unhooked_invoke_returns_original() {
        let runtime = SimulatedRuntime::new(33);
        assert_eq!(runtime.invoke(&TARGET, HookValue::Double(3.0)), HookValue::Double(3.0));
    }

    #[test]
    fn test_hooks_run_in_order() {
        let runtime = SimulatedRuntime::new(33);
        runtime
            .hook_after(&TARGET, Arc::new(|f: &mut CallFrame| f.set_result(HookValue::Double(1.0))))
            .unwrap();
        runtime
            .hook_after(&TARGET, Arc::new(|f: &mut CallFrame| {
                let v = f.result().as_f64().unwrap_or(0.0);
                f.set_result(HookValue::Double(v + 1.0));
            }))
            .unwrap();

        assert_eq!(runtime.invoke(&TARGET, HookValue::Double(0.0)), HookValue::Double(2.0));
        assert_eq!(runtime.hook_count(&TARGET), 2);
        assert_eq!(runtime.registrations(), 2);
    }

    #[test]
    fn test_missing_class_and_method() {
        let runtime = SimulatedRuntime::new(33).without_class("android.location.Location");
        let err = runtime.hook_after(&TARGET, Arc::new(|_: &mut CallFrame| {})).unwrap_err();
        assert_eq!(err, HookError::ClassNotFound("android.location.Location".to_string()));

        let runtime = SimulatedRuntime::new(33);
        runtime.hide("android.location.Location#getLatitude");
        let err = runtime.hook_after(&TARGET, Arc::new(|_: &mut CallFrame| {})).unwrap_err();
        assert!(matches!(err, HookError::MethodNotFound(_)));
        assert!(!runtime.is_hooked(&TARGET));
    }
}
