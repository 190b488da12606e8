//! Busy flags lowered by a drop guard.

use dioxus::prelude::*;

/// Raises a busy flag for as long as it lives. Held across the awaits of an
/// action, it lowers the flag on success, on error and on cancellation alike.
pub(crate) struct BusyFlag(Signal<bool>);

impl BusyFlag {
    pub(crate) fn raise(mut flag: Signal<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyFlag {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::core::{NoOpMutations, VirtualDom};

    fn dom() -> VirtualDom {
        let mut dom = VirtualDom::new(|| rsx! {});
        dom.rebuild_in_place();
        dom
    }

    #[test]
    fn test_flag_follows_guard_lifetime() {
        let dom = dom();
        dom.in_scope(ScopeId::ROOT, || {
            let flag = Signal::new(false);
            {
                let _busy = BusyFlag::raise(flag);
                assert!(flag());
            }
            assert!(!flag());
        });
    }

    #[tokio::test]
    async fn test_cancelled_task_lowers_flag() {
        let mut dom = dom();
        let (flag, task) = dom.in_scope(ScopeId::ROOT, || {
            let flag = Signal::new(false);
            let task = spawn(async move {
                let _busy = BusyFlag::raise(flag);
                std::future::pending::<()>().await;
            });
            (flag, task)
        });

        tokio::select! {
            _ = dom.wait_for_work() => {}
            _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {}
        }
        dom.render_immediate(&mut NoOpMutations);
        assert!(dom.in_runtime(|| flag()));

        dom.in_runtime(|| task.cancel());
        assert!(!dom.in_runtime(|| flag()));
    }
}
