//! SCSS variables.
//!
//! Global and light variables are written as `$name`, dark ones as
//! `$dark-name` (prefix configurable). Keyframes are emitted as plain
//! `@keyframes` rules.

use std::fmt::Write as _;

use crate::error::EmitError;
use crate::variables::VariableMap;

use super::css::keyframes_block;
use super::{comment_text, sanitize_name, sanitize_value, EmitContext, GENERATOR};

pub fn emit(ctx: &EmitContext<'_>) -> Result<String, EmitError> {
    let theme = ctx.theme;
    let prefix = sanitize_name(&ctx.options.scss.dark_prefix);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "// {} ({})\n// Generated by {GENERATOR}. Do not edit.",
        comment_text(&theme.name),
        comment_text(&theme.id)
    );

    write_section(&mut out, "Global", "", &theme.global);
    write_section(&mut out, "Light", "", &theme.light);
    write_section(&mut out, "Dark", &prefix, &theme.dark);

    for spec in &theme.animations {
        out.push('\n');
        out.push_str(&keyframes_block(spec));
    }
    Ok(out)
}

fn write_section(out: &mut String, title: &str, prefix: &str, map: &VariableMap) {
    if map.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n// {title}");
    for (name, variable) in map.iter() {
        let _ = writeln!(
            out,
            "${prefix}{}: {};",
            sanitize_name(name),
            sanitize_value(&variable.value)
        );
    }
}
