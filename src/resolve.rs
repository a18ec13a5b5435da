use anyhow::{bail, Result};

use crate::context::ContextEnv;

/// Expands `{token}` placeholders in config strings.
///
/// Known tokens: `{config_dir}`, `{cwd}`, `{home}`, `{env.NAME}`.
pub struct Resolver<'a> {
    pub ctx: &'a ContextEnv,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a ContextEnv) -> Self {
        Self { ctx }
    }

    pub fn resolve(&self, input: &str) -> Result<String> {
        // Fast path
        if !input.contains('{') {
            return Ok(input.to_string());
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                bail!("unclosed token in string: {input}");
            };

            let token = &after[..end];
            let repl = self
                .token_value(token)
                .ok_or_else(|| anyhow::anyhow!("unknown token: {{{token}}} in: {input}"))?;

            out.push_str(&repl);
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }

    fn token_value(&self, token: &str) -> Option<String> {
        if let Some(name) = token.strip_prefix("env.") {
            return self.ctx.var(name).map(str::to_string);
        }

        match token {
            "config_dir" => Some(self.ctx.config_dir().to_string_lossy().to_string()),
            "cwd" => Some(self.ctx.cwd().to_string_lossy().to_string()),
            "home" => self.ctx.home().map(|p| p.to_string_lossy().to_string()),
            _ => None,
        }
    }
}
