#![allow(dead_code)]

pub use parallel_rc_test_utils::{init_tracing, with_timeout};
pub use parallel_rc_test_utils::builders::{commands, ScriptBuilder};
pub use parallel_rc_test_utils::fake_executor::{ExecProbe, Script, ScriptedExecutor};
