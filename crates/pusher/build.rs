// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let path = std::path::Path::new(&out_dir).join("env_vars.rs");
    let mut f = std::fs::File::create(path)?;

    let vars = [
        ("EVSYNC_REMOTE_URL", "EVSYNC_REMOTE_URL"),
        ("EVSYNC_ACCESS_KEY", "EVSYNC_ACCESS_KEY"),
        ("EVSYNC_SECRET", "EVSYNC_SECRET"),
        ("EVSYNC_CONFIG", "EVSYNC_CONFIG"),
    ];

    for (const_name, env_name) in &vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";")?;
    }

    Ok(())
}
