// src/commands/shebang.rs

use std::sync::LazyLock;

use regex::Regex;

static SHEBANG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#!\s*(?:(?:\S*/)?env\s+)?(?P<shell>\S.*?)\s*?(?:\n|$)")
        .unwrap_or_else(|e| panic!("invalid shebang regex: {e}"))
});

/// Extract the interpreter from a leading `#!` line.
///
/// `/usr/bin/env` is skipped, so `#!/usr/bin/env bash` yields `bash` while
/// `#!/bin/zsh -e` yields `/bin/zsh -e`.
pub fn shebang(script: &str) -> Option<String> {
    SHEBANG
        .captures(script)
        .and_then(|caps| caps.name("shell"))
        .map(|m| m.as_str().to_string())
}
